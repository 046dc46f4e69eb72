//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! POST /Api/...
//!     → request.rs (Api-* headers, API key, request id)
//!     → server.rs (JSON body, required fields, Gateway::execute)
//!     → response.rs (errors as {"Code", "Message"})
//!     → Send to client, request id echoed
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{generate_request_id, ApiHeaders};
pub use response::ErrorBody;
pub use server::{AppState, HttpServer};
