//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http / gateway / net
//!     → logging.rs (one global subscriber, pretty or JSON)
//!     → metrics.rs (call outcomes, socket gauge, HTTP statuses)
//!     → tracing.rs (request span → System I span)
//! ```
//!
//! # Design Decisions
//! - The request id rides on the request span, so every event of a call carries it
//! - Metric updates are no-ops until the Prometheus recorder is installed
//! - Raw System I payloads only appear at debug level

pub mod logging;
pub mod metrics;
pub mod tracing;
