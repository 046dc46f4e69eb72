//! Caller headers.
//!
//! # Responsibilities
//! - Read the `Api-*` headers every operation requires
//! - Generate a request id when the caller sent none
//! - Default the response language to `EN`
//! - Validate the headers in a fixed order: key, request id, channel, device OS
//!
//! # Design Decisions
//! - `X-Request-ID` wins over `Api-RequestID` when both are present
//! - The id is echoed back on both headers, success or failure

use axum::http::HeaderMap;
use chrono::Local;
use rand::Rng;

use crate::error::{ErrorKind, GatewayError};
use crate::security::{ApiKeyRepository, Client};

pub const API_KEY: &str = "api-key";
pub const API_REQUEST_ID: &str = "api-requestid";
pub const X_REQUEST_ID: &str = "x-request-id";
pub const API_CHANNEL: &str = "api-channel";
pub const API_DEVICE_OS: &str = "api-deviceos";
pub const API_LANGUAGE: &str = "api-language";

pub const DEFAULT_LANGUAGE: &str = "EN";

/// System I accepts at most 20 characters of request id.
pub const MAX_REQUEST_ID_LENGTH: usize = 20;

/// Headers of one API call, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiHeaders {
    pub api_key: Option<String>,
    pub request_id: String,
    pub channel: String,
    pub device_os: String,
    /// Preferred language of the caller; never validated.
    pub language: String,
}

impl ApiHeaders {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let request_id = header(headers, X_REQUEST_ID)
            .or_else(|| header(headers, API_REQUEST_ID))
            .unwrap_or_else(generate_request_id);

        Self {
            api_key: header(headers, API_KEY),
            request_id,
            channel: header(headers, API_CHANNEL).unwrap_or_default(),
            device_os: header(headers, API_DEVICE_OS).unwrap_or_default(),
            language: header(headers, API_LANGUAGE).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        }
    }

    /// Authorize the key for `METHOD:PATH`, then check the remaining headers.
    pub fn validate(&self, keys: &ApiKeyRepository, method: &str, path: &str) -> Result<Client, GatewayError> {
        let client = keys.authorize(self.api_key.as_deref(), method, path)?;

        if self.request_id.is_empty() || self.request_id.chars().count() > MAX_REQUEST_ID_LENGTH {
            return Err(ErrorKind::InvalidRequestId.into());
        }
        if self.channel.is_empty() {
            return Err(ErrorKind::InvalidChannel.into());
        }
        if self.device_os.is_empty() {
            return Err(ErrorKind::InvalidDeviceOs.into());
        }
        Ok(client)
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// `RQ` + local `YYYYMMDDhhmmss` + four random digits.
pub fn generate_request_id() -> String {
    let running: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("RQ{}{:04}", Local::now().format("%Y%m%d%H%M%S"), running)
}
