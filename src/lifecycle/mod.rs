//! Process lifecycle.
//!
//! # Data Flow
//! ```text
//! startup.rs:  config file → logging → metrics → gateway state → bind → serve
//! signals.rs:  SIGINT / SIGTERM → Shutdown::trigger
//! shutdown.rs: broadcast → HTTP server drains and returns
//! ```
//!
//! In-flight System I calls are not cancelled; their own socket deadlines
//! bound how long draining takes.

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{build_state, run, StartupError};
