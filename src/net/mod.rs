//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway call (Endpoint, message text)
//!     → transport.rs (dial with timeout, one socket per call)
//!     → connection.rs (open-socket tracking)
//!     → framing.rs (length prefix or unframed single read)
//!     → transport.rs (response text or tagged TransportError)
//! ```
//!
//! # Design Decisions
//! - Each call owns its socket; nothing is pooled
//! - Every blocking step is bounded by a timeout
//! - Failures carry a typed tag so callers never parse error strings

pub mod connection;
pub mod framing;
pub mod transport;

pub use connection::{ConnectionTracker, SocketId, SocketLease};
pub use framing::{FrameError, FrameLimits};
pub use transport::{FailureTag, TcpTransport, Transport, TransportError};
