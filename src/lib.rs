//! System I gateway library.
//!
//! Translates JSON operations into System I's fixed-width TCP protocol and
//! back: 123-character header, TIS-620 bytes, one socket per call.

pub mod codec;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod net;
pub mod observability;
pub mod operations;
pub mod routing;
pub mod security;

pub use config::GatewayConfig;
pub use error::{ErrorKind, GatewayError};
pub use gateway::Gateway;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
