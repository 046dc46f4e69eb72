//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference existing destinations)
//! - Validate value ranges (timeouts > 0, port pools non-empty)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::{DestinationKind, GatewayConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Route key is not of the form `METHOD:PATH`.
    MalformedRouteKey(String),
    /// Route points at a destination that is not defined.
    UnknownDestination { route: String, destination: String },
    /// TCP destination without any port to dial.
    EmptyPortPool { destination: String, operation: Option<String> },
    /// A timeout or size limit of zero.
    ZeroLimit(&'static str),
    /// HTTP request timeout would fire before the System I exchange can.
    RequestTimeoutTooShort { request_secs: u64, transport_secs: u64 },
    /// Route points at a destination that is not a System I socket.
    NotTcpDestination { route: String, destination: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MalformedRouteKey(key) => {
                write!(f, "route key '{}' is not METHOD:PATH", key)
            }
            ValidationError::UnknownDestination { route, destination } => {
                write!(f, "route '{}' references unknown destination '{}'", route, destination)
            }
            ValidationError::EmptyPortPool { destination, operation: None } => {
                write!(f, "destination '{}' has an empty port pool", destination)
            }
            ValidationError::EmptyPortPool { destination, operation: Some(op) } => {
                write!(f, "destination '{}' has an empty port pool for '{}'", destination, op)
            }
            ValidationError::ZeroLimit(name) => write!(f, "{} must be greater than zero", name),
            ValidationError::RequestTimeoutTooShort { request_secs, transport_secs } => write!(
                f,
                "server.request_timeout_secs ({}) must exceed dial plus io timeout ({})",
                request_secs, transport_secs
            ),
            ValidationError::NotTcpDestination { route, destination } => {
                write!(f, "route '{}' targets non-tcp destination '{}'", route, destination)
            }
        }
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let limits = [
        ("transport.dial_timeout_secs", config.transport.dial_timeout_secs as usize),
        ("transport.io_timeout_secs", config.transport.io_timeout_secs as usize),
        ("transport.unframed_buffer_bytes", config.transport.unframed_buffer_bytes),
        ("transport.max_frame_bytes", config.transport.max_frame_bytes),
        ("server.request_timeout_secs", config.server.request_timeout_secs as usize),
    ];
    for (name, value) in limits {
        if value == 0 {
            errors.push(ValidationError::ZeroLimit(name));
        }
    }

    let transport_secs = config.transport.dial_timeout_secs.saturating_add(config.transport.io_timeout_secs);
    if config.server.request_timeout_secs <= transport_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_secs: config.server.request_timeout_secs,
            transport_secs,
        });
    }

    let mut route_keys: Vec<&String> = config.routes.keys().collect();
    route_keys.sort();
    for key in route_keys {
        let route = &config.routes[key];
        match key.split_once(':') {
            Some((method, path)) if !method.is_empty() && path.starts_with('/') => {}
            _ => errors.push(ValidationError::MalformedRouteKey(key.clone())),
        }
        match config.destinations.get(&route.destination) {
            None => errors.push(ValidationError::UnknownDestination {
                route: key.clone(),
                destination: route.destination.clone(),
            }),
            Some(destination) if destination.kind != DestinationKind::Tcp => {
                errors.push(ValidationError::NotTcpDestination {
                    route: key.clone(),
                    destination: route.destination.clone(),
                })
            }
            Some(_) => {}
        }
    }

    let mut names: Vec<&String> = config.destinations.keys().collect();
    names.sort();
    for name in names {
        let destination = &config.destinations[name];
        if destination.kind != DestinationKind::Tcp {
            continue;
        }
        // Operations without their own pool fall back to `ports`.
        if destination.ports.is_empty() {
            errors.push(ValidationError::EmptyPortPool { destination: name.clone(), operation: None });
        }
        let mut operations: Vec<&String> = destination.operation_ports.keys().collect();
        operations.sort();
        for operation in operations {
            if destination.operation_ports[operation].is_empty() {
                errors.push(ValidationError::EmptyPortPool {
                    destination: name.clone(),
                    operation: Some(operation.clone()),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{Destination, Framing, Route};
    use std::collections::HashMap;

    fn systemi(ports: Vec<u16>) -> Destination {
        Destination {
            kind: DestinationKind::Tcp,
            host: "127.0.0.1".into(),
            ports,
            operation_ports: HashMap::new(),
            framing: Framing::LengthPrefixed,
        }
    }

    fn route(destination: &str) -> Route {
        Route {
            system: "SYSI".into(),
            service: "COLDETAIL".into(),
            format: "FX1".into(),
            destination: destination.into(),
        }
    }

    #[test]
    fn valid_config_passes() {
        let mut config = GatewayConfig::default();
        config.destinations.insert("systemi".into(), systemi(vec![7001]));
        config.routes.insert("POST:/Api/Collection/CollectionDetail".into(), route("systemi"));
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let mut config = GatewayConfig::default();
        config.transport.io_timeout_secs = 0;
        config.destinations.insert("systemi".into(), systemi(vec![]));
        config.routes.insert("CollectionDetail".into(), route("mainframe"));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroLimit("transport.io_timeout_secs"),
                ValidationError::MalformedRouteKey("CollectionDetail".into()),
                ValidationError::UnknownDestination {
                    route: "CollectionDetail".into(),
                    destination: "mainframe".into(),
                },
                ValidationError::EmptyPortPool { destination: "systemi".into(), operation: None },
            ]
        );
    }

    #[test]
    fn empty_operation_pool_is_rejected() {
        let mut config = GatewayConfig::default();
        let mut destination = systemi(vec![7001]);
        destination.operation_ports.insert("CollectionLog".into(), vec![]);
        config.destinations.insert("systemi".into(), destination);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::EmptyPortPool {
                destination: "systemi".into(),
                operation: Some("CollectionLog".into()),
            }]
        );
    }

    #[test]
    fn operation_pools_do_not_replace_default_ports() {
        let mut config = GatewayConfig::default();
        let mut destination = systemi(vec![]);
        destination.operation_ports.insert("CollectionLog".into(), vec![7101]);
        config.destinations.insert("systemi".into(), destination);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::EmptyPortPool { destination: "systemi".into(), operation: None }]
        );
    }

    #[test]
    fn route_to_https_destination_is_rejected() {
        let mut config = GatewayConfig::default();
        let mut destination = systemi(vec![]);
        destination.kind = DestinationKind::Https;
        config.destinations.insert("dopa".into(), destination);
        config.routes.insert("POST:/Api/Collection/CollectionDetail".into(), route("dopa"));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::NotTcpDestination {
                route: "POST:/Api/Collection/CollectionDetail".into(),
                destination: "dopa".into(),
            }]
        );
    }

    #[test]
    fn request_timeout_must_outlast_the_exchange() {
        let mut config = GatewayConfig::default();
        config.server.request_timeout_secs = 15;
        config.transport.dial_timeout_secs = 5;
        config.transport.io_timeout_secs = 10;
        config.destinations.insert("systemi".into(), systemi(vec![7001]));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::RequestTimeoutTooShort { request_secs: 15, transport_secs: 15 }]
        );

        config.server.request_timeout_secs = 16;
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn https_destination_needs_no_ports() {
        let mut config = GatewayConfig::default();
        let mut destination = systemi(vec![]);
        destination.kind = DestinationKind::Https;
        config.destinations.insert("dopa".into(), destination);
        assert_eq!(validate_config(&config), Ok(()));
    }
}
