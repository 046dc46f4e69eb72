//! Route and destination lookup.
//!
//! # Responsibilities
//! - Map an operation's `METHOD:PATH` to its System I routing codes
//! - Resolve the destination the route names and check its protocol
//! - Draw one port from the destination's pool per call
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) lookups via HashMap
//! - Explicit errors rather than fallbacks; the caller maps them to a
//!   configuration failure

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{Destination, DestinationKind, Framing, Route};
use crate::load_balancer::{PortSelector, UniformRandom};

/// Lookup key for an operation's route.
pub fn route_key(method: &str, path: &str) -> String {
    format!("{}:{}", method, path)
}

/// Routing failures. All of them mean the deployment is misconfigured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no route configured for {0}")]
    RouteNotFound(String),

    #[error("destination '{0}' is not configured")]
    DestinationNotFound(String),

    #[error("destination '{name}' is {actual}, expected {expected}")]
    KindMismatch { name: String, expected: DestinationKind, actual: DestinationKind },

    #[error("destination '{name}' has no ports for {operation}")]
    EmptyPortPool { name: String, operation: String },
}

/// Where one call is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// `host:port`
    pub address: String,
    pub framing: Framing,
}

/// Everything the gateway needs to address one backend call.
#[derive(Debug, Clone)]
pub struct RouteTarget {
    pub route: Route,
    pub destination: String,
    pub endpoint: Endpoint,
}

/// Resolves operations to System I endpoints.
pub struct DestinationRouter {
    routes: HashMap<String, Route>,
    destinations: HashMap<String, Destination>,
    selector: Arc<dyn PortSelector>,
}

impl std::fmt::Debug for DestinationRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DestinationRouter")
            .field("routes", &self.routes.len())
            .field("destinations", &self.destinations.len())
            .finish()
    }
}

impl DestinationRouter {
    pub fn new(routes: HashMap<String, Route>, destinations: HashMap<String, Destination>) -> Self {
        Self::with_selector(routes, destinations, Arc::new(UniformRandom::new()))
    }

    pub fn with_selector(
        routes: HashMap<String, Route>,
        destinations: HashMap<String, Destination>,
        selector: Arc<dyn PortSelector>,
    ) -> Self {
        Self { routes, destinations, selector }
    }

    /// Routing codes for `METHOD:PATH`.
    pub fn resolve_route(&self, method: &str, path: &str) -> Result<&Route, ConfigurationError> {
        let key = route_key(method, path);
        self.routes.get(&key).ok_or(ConfigurationError::RouteNotFound(key))
    }

    /// Named destination, which must speak `expected`.
    pub fn resolve_destination(
        &self,
        name: &str,
        expected: DestinationKind,
    ) -> Result<&Destination, ConfigurationError> {
        let destination = self
            .destinations
            .get(name)
            .ok_or_else(|| ConfigurationError::DestinationNotFound(name.to_string()))?;
        if destination.kind != expected {
            return Err(ConfigurationError::KindMismatch {
                name: name.to_string(),
                expected,
                actual: destination.kind,
            });
        }
        Ok(destination)
    }

    /// Draw one port for `operation` from `destination`'s pool.
    pub fn pick_port(&self, name: &str, destination: &Destination, operation: &str) -> Result<u16, ConfigurationError> {
        self.selector
            .select(destination.port_pool(operation))
            .ok_or_else(|| ConfigurationError::EmptyPortPool {
                name: name.to_string(),
                operation: operation.to_string(),
            })
    }

    /// Full resolution for one TCP call.
    pub fn resolve(&self, method: &str, path: &str, operation: &str) -> Result<RouteTarget, ConfigurationError> {
        let route = self.resolve_route(method, path)?;
        let destination = self.resolve_destination(&route.destination, DestinationKind::Tcp)?;
        let port = self.pick_port(&route.destination, destination, operation)?;

        tracing::debug!(
            operation,
            destination = %route.destination,
            host = %destination.host,
            port,
            "Resolved System I endpoint"
        );

        Ok(RouteTarget {
            route: route.clone(),
            destination: route.destination.clone(),
            endpoint: Endpoint {
                address: format!("{}:{}", destination.host, port),
                framing: destination.framing,
            },
        })
    }
}
