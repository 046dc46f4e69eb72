//! System I operations.
//!
//! # Data Flow
//! ```text
//! JSON request → Operation::Request
//!     → Operation::missing_fields (required-field check)
//!     → Operation::oversized_fields (declared max lengths)
//!     → Operation::encode (fixed-width body)
//!     → gateway (header, transport, status classification)
//!     → Operation::decode (full response message)
//!     → Operation::Response → JSON
//! ```
//!
//! # Design Decisions
//! - Each operation is a zero-sized type; its layouts and status table are
//!   statics next to it
//! - `decode` receives the whole message and checks the body's minimum
//!   length itself, since that minimum differs per operation

pub mod collection;
pub mod consent;
pub mod self_service;

pub use collection::{CollectionDetail, CollectionLog};
pub use consent::UpdateConsent;
pub use self_service::{MyCard, MyCardAll};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::codec::{Field, ProtocolError};
use crate::error::ErrorTable;

/// One request/response exchange with System I.
pub trait Operation: Send + Sync + 'static {
    /// Operation name; also the key of its port pool.
    const NAME: &'static str;
    const METHOD: &'static str;
    const PATH: &'static str;

    type Request: DeserializeOwned + Send + Sync + 'static;
    type Response: Serialize + Send + 'static;

    /// Fixed-width request body. Never fails; over-long values are truncated.
    fn encode(request: &Self::Request) -> String;

    /// Decode a full response message, header included.
    fn decode(message: &[char]) -> Result<Self::Response, ProtocolError>;

    /// Backend status codes this operation maps.
    fn error_table() -> &'static ErrorTable;

    /// Names of required fields that are empty.
    fn missing_fields(_request: &Self::Request) -> Vec<String> {
        Vec::new()
    }

    /// Names of fields longer than the caller contract allows. Checked
    /// after `missing_fields`, before anything is encoded.
    fn oversized_fields(_request: &Self::Request) -> Vec<String> {
        Vec::new()
    }
}

/// Push `name` when `value` is blank.
pub(crate) fn require(missing: &mut Vec<String>, name: impl Into<String>, value: &str) {
    if value.trim().is_empty() {
        missing.push(name.into());
    }
}

/// Push `name` when `value` has more than `max` characters.
pub(crate) fn limit(oversized: &mut Vec<String>, name: impl Into<String>, value: &str, max: usize) {
    if value.chars().count() > max {
        oversized.push(name.into());
    }
}

/// [`limit`] to the width of a text column.
pub(crate) fn limit_to(oversized: &mut Vec<String>, field: &Field, value: &str) {
    limit(oversized, field.name, value, field.length);
}

/// Accept a JSON string or number as text.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null => String::new(),
    })
}

/// Mask a 16-digit card number as `6 digits + XXXXXX + last 4`.
pub(crate) fn mask_card_number(card: &str) -> String {
    let chars: Vec<char> = card.chars().collect();
    if chars.len() != 16 {
        return card.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[12..].iter().collect();
    format!("{}XXXXXX{}", head, tail)
}
