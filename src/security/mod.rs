//! Client authorization.
//!
//! # Data Flow
//! ```text
//! Api-Key header
//!     → api_key.rs (lookup, status check, METHOD:PATH permission)
//!     → handler runs, or Unauthorized
//! ```
//!
//! # Design Decisions
//! - Keys come from config and never change while running
//! - Fail closed: unknown, inactive, or under-privileged keys are all
//!   reported the same way to the client

pub mod api_key;

pub use api_key::{ApiKeyRepository, Client};
