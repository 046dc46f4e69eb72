//! Request-scoped spans.
//!
//! Every log event emitted while serving a request is recorded inside the
//! span returned here, so the request id appears on all of them.

use tracing::Span;

/// Span covering one client request.
pub fn request_span(request_id: &str, channel: &str, language: &str, operation: &'static str, path: &str) -> Span {
    tracing::info_span!(
        "request",
        request_id = %request_id,
        channel = %channel,
        language = %language,
        operation,
        path = %path
    )
}

/// Span covering one System I exchange.
pub fn backend_span(operation: &'static str, address: &str) -> Span {
    tracing::debug_span!("systemi", operation, address = %address)
}
