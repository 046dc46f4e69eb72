//! Port selection subsystem.
//!
//! # Data Flow
//! ```text
//! Route matched → destination identified
//!     → Destination::port_pool(operation)
//!     → PortSelector picks one port for this call
//!     → host:port handed to the transport
//! ```
//!
//! # Design Decisions
//! - Selection is per call; no stickiness or connection reuse
//! - Selectors are stateless apart from their random source
//! - An empty pool yields `None` and the caller reports a configuration error

pub mod random;

pub use random::UniformRandom;

/// Chooses one port out of a destination's pool.
pub trait PortSelector: Send + Sync {
    fn select(&self, ports: &[u16]) -> Option<u16>;
}
