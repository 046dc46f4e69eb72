//! Error responses.
//!
//! # Design Decisions
//! - Every failure renders as `{"Code", "Message"}` with the kind's HTTP status
//! - Backend codes, messages and addresses never reach the body

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::GatewayError;

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl From<&GatewayError> for ErrorBody {
    fn from(e: &GatewayError) -> Self {
        Self { code: e.code().to_string(), message: e.client_message() }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
