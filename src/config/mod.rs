//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → route/destination tables moved into the DestinationRouter
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at startup and never mutated
//! - All sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ApiKeyConfig, Destination, DestinationKind, Framing, GatewayConfig, LogFormat, ObservabilityConfig, Route,
    ServerConfig, TransportConfig,
};
