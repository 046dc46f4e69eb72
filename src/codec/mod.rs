//! System I wire format.
//!
//! # Data Flow
//! ```text
//! Request:
//!     domain request
//!     → operation layout (fixed.rs writer)       body text
//!     → header.rs (123-char envelope header)     header + body
//!     → net transport (tis620.rs → bytes)
//!
//! Response:
//!     net transport (bytes → tis620.rs)          message text
//!     → header.rs (status code / message)
//!     → operation layout (fixed.rs reader)       domain response
//! ```
//!
//! # Design Decisions
//! - Layouts are static tables shared by encode and decode
//! - Encode never fails; over-length values are truncated per field
//! - Decode tolerates partial repeating data but not a missing body

pub mod fixed;
pub mod header;
pub mod tis620;

pub use fixed::{pad_or_truncate, BlockCount, Field, FieldKind, Layout, RecordReader, RecordWriter, RepeatingGroup};
pub use header::{build_header, ResponseHeader, HEADER_LENGTH, MAX_MESSAGE_LENGTH};

/// A response that cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("message too short: {length} characters, need at least {required}")]
    TooShort { length: usize, required: usize },

    #[error("message body missing: {length} characters is header only")]
    MissingBody { length: usize },

    #[error("message of {length} characters exceeds the {max} character limit")]
    TooLong { length: usize, max: usize },
}

/// Split a full message into its body, requiring at least `min_body` characters.
pub fn split_body(message: &[char], min_body: usize) -> Result<&[char], ProtocolError> {
    if message.len() <= HEADER_LENGTH {
        return Err(ProtocolError::MissingBody { length: message.len() });
    }
    let body = &message[HEADER_LENGTH..];
    if body.len() < min_body {
        return Err(ProtocolError::TooShort {
            length: message.len(),
            required: HEADER_LENGTH + min_body,
        });
    }
    Ok(body)
}
