//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Operation (METHOD, PATH, name)
//!     → router.rs: route table lookup by "METHOD:PATH"
//!     → destination table lookup by route.destination
//!     → port pool for the operation (load_balancer)
//!     → Return: RouteTarget { route codes, endpoint } or ConfigurationError
//! ```
//!
//! # Design Decisions
//! - Tables are built from config at startup, immutable at runtime
//! - Lookups are exact; there is no prefix or wildcard matching
//! - Every miss is an explicit configuration error, never a silent default

pub mod router;

pub use router::{route_key, ConfigurationError, DestinationRouter, Endpoint, RouteTarget};
