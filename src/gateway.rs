//! One System I call, end to end.
//!
//! # Data Flow
//! ```text
//! Operation request + request id
//!     → DestinationRouter::resolve (route codes, host:port, framing)
//!     → Operation::encode → length check → build_header
//!     → Transport::send_and_receive
//!     → classify (header status vs operation error table)
//!     → Operation::decode
//! ```
//!
//! # Design Decisions
//! - Stateless apart from shared, read-only router and transport
//! - Every failure leaves as a `GatewayError`; nothing panics on backend input
//! - Backend payloads are logged at debug level only

use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;

use crate::codec::{build_header, ProtocolError, HEADER_LENGTH, MAX_MESSAGE_LENGTH};
use crate::error::{classify, ErrorCategory, GatewayError};
use crate::net::Transport;
use crate::observability::{metrics, tracing as spans};
use crate::operations::Operation;
use crate::routing::DestinationRouter;

/// Executes operations against System I.
#[derive(Clone)]
pub struct Gateway {
    router: Arc<DestinationRouter>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway").field("router", &self.router).finish_non_exhaustive()
    }
}

impl Gateway {
    pub fn new(router: Arc<DestinationRouter>, transport: Arc<dyn Transport>) -> Self {
        Self { router, transport }
    }

    /// Run `O` for one request.
    pub async fn execute<O: Operation>(&self, request_id: &str, request: &O::Request) -> Result<O::Response, GatewayError> {
        let start = Instant::now();
        let result = self.call::<O>(request_id, request).await;

        match &result {
            Ok(_) => {
                metrics::record_call(O::NAME, "success", start);
                tracing::info!(operation = O::NAME, elapsed_ms = start.elapsed().as_millis() as u64, "System I call succeeded");
            }
            Err(e) => {
                metrics::record_call(O::NAME, e.code(), start);
                log_failure(O::NAME, e);
            }
        }
        result
    }

    async fn call<O: Operation>(&self, request_id: &str, request: &O::Request) -> Result<O::Response, GatewayError> {
        let target = self.router.resolve(O::METHOD, O::PATH, O::NAME)?;

        let body = O::encode(request);
        let body_length = body.chars().count();
        let total = HEADER_LENGTH + body_length;
        if total > MAX_MESSAGE_LENGTH {
            return Err(ProtocolError::TooLong { length: total, max: MAX_MESSAGE_LENGTH }.into());
        }

        let mut message = build_header(&target.route, request_id, body_length);
        message.push_str(&body);
        tracing::debug!(operation = O::NAME, payload = %message, "Sending System I request");

        let response = self
            .transport
            .send_and_receive(&target.endpoint, &message)
            .instrument(spans::backend_span(O::NAME, &target.endpoint.address))
            .await?;
        tracing::debug!(operation = O::NAME, payload = %response, "Received System I response");

        let chars: Vec<char> = response.chars().collect();
        if let Some(err) = classify(&chars, O::error_table())? {
            return Err(err);
        }
        Ok(O::decode(&chars)?)
    }
}

fn log_failure(operation: &'static str, e: &GatewayError) {
    let source = e.source.as_ref().map(|s| s.to_string()).unwrap_or_default();
    match e.kind.category() {
        ErrorCategory::DownstreamBusiness | ErrorCategory::Request => {
            tracing::info!(operation, code = e.code(), "System I call rejected");
        }
        ErrorCategory::UnexpectedDownstream => {
            let (raw_code, raw_message) = e
                .downstream
                .as_ref()
                .map(|d| (d.code.as_str(), d.message.as_str()))
                .unwrap_or_default();
            tracing::warn!(operation, code = e.code(), raw_code, raw_message, "System I returned an unknown status");
        }
        ErrorCategory::Transport => {
            tracing::warn!(operation, code = e.code(), error = %source, "System I unreachable");
        }
        ErrorCategory::Configuration | ErrorCategory::Protocol => {
            tracing::error!(operation, code = e.code(), error = %source, "System I call failed");
        }
    }
}
