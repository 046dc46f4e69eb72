//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// System I socket settings.
    pub transport: TransportConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Client API keys and their permissions.
    pub api_keys: Vec<ApiKeyConfig>,

    /// Backend targets by name.
    pub destinations: HashMap<String, Destination>,

    /// Backend routing codes keyed by `METHOD:PATH`.
    pub routes: HashMap<String, Route>,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Upper bound on a whole HTTP request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Socket timeouts and buffer limits for System I.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Connection establishment timeout in seconds.
    pub dial_timeout_secs: u64,

    /// Deadline for the whole write + read exchange, in seconds.
    pub io_timeout_secs: u64,

    /// Single-read buffer size for unframed destinations.
    pub unframed_buffer_bytes: usize,

    /// Largest length prefix accepted from a framed destination.
    pub max_frame_bytes: usize,
}

impl TransportConfig {
    pub fn dial_timeout(&self) -> Duration {
        Duration::from_secs(self.dial_timeout_secs)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.io_timeout_secs)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            dial_timeout_secs: 5,
            io_timeout_secs: 10,
            unframed_buffer_bytes: 4096,
            max_frame_bytes: 1024 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A client API key.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiKeyConfig {
    pub key: String,

    #[serde(default)]
    pub client_name: String,

    /// Only "active" keys are accepted.
    #[serde(default = "default_key_status")]
    pub status: String,

    /// Granted operations as `METHOD:PATH`.
    #[serde(default)]
    pub permissions: Vec<String>,
}

fn default_key_status() -> String {
    "active".to_string()
}

/// Protocol spoken by a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    Tcp,
    Https,
}

impl std::fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DestinationKind::Tcp => write!(f, "tcp"),
            DestinationKind::Https => write!(f, "https"),
        }
    }
}

/// Byte framing on a TCP destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    /// 4-byte big-endian length prefix in both directions.
    #[default]
    LengthPrefixed,
    /// No prefix; the response is whatever one read returns.
    Unframed,
}

/// A named backend target.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Destination {
    #[serde(rename = "type")]
    pub kind: DestinationKind,

    pub host: String,

    /// Default listener ports; one is drawn per call.
    #[serde(default)]
    pub ports: Vec<u16>,

    /// Per-operation port pools, keyed by operation name.
    #[serde(default)]
    pub operation_ports: HashMap<String, Vec<u16>>,

    #[serde(default)]
    pub framing: Framing,
}

impl Destination {
    /// Port pool for `operation`, falling back to the default pool.
    pub fn port_pool(&self, operation: &str) -> &[u16] {
        self.operation_ports
            .get(operation)
            .map(Vec::as_slice)
            .unwrap_or(&self.ports)
    }
}

/// System I routing codes for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Route {
    pub system: String,
    pub service: String,
    pub format: String,

    /// Destination name.
    #[serde(default = "default_destination")]
    pub destination: String,
}

fn default_destination() -> String {
    "systemi".to_string()
}
