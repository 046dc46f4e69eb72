//! Backend status and transport failure classification.
//!
//! Status codes are looked up in a per-operation table. A blank code is
//! success; an unknown code is an unexpected downstream error.

use crate::codec::{ProtocolError, ResponseHeader};
use crate::error::{ErrorKind, GatewayError};
use crate::net::TransportError;

/// Backend status codes an operation knows about.
#[derive(Debug, Clone, Copy)]
pub struct ErrorTable {
    entries: &'static [(&'static str, ErrorKind)],
}

impl ErrorTable {
    pub const fn new(entries: &'static [(&'static str, ErrorKind)]) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, code: &str) -> Option<ErrorKind> {
        self.entries.iter().find(|(known, _)| *known == code).map(|(_, kind)| *kind)
    }
}

/// Map a backend status code and message to an error, or `None` on success.
pub fn classify_status(code: &str, message: &str, table: &ErrorTable) -> Option<GatewayError> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }

    let err = match table.lookup(code) {
        Some(kind) => {
            tracing::info!(code, message, mapped = kind.code(), "System I business error");
            GatewayError::new(kind)
        }
        None => {
            tracing::warn!(code, message, "Unrecognized System I status code");
            GatewayError::new(ErrorKind::UnexpectedDownstream)
        }
    };
    Some(err.with_downstream(code, message.trim()))
}

/// Classify a full response message by its header status fields.
pub fn classify(message: &[char], table: &ErrorTable) -> Result<Option<GatewayError>, ProtocolError> {
    let header = ResponseHeader::parse(message)?;
    Ok(classify_status(&header.response_code, &header.response_message, table))
}

/// Map a transport failure by its tag alone.
pub fn classify_transport_failure(err: TransportError) -> GatewayError {
    let kind = match &err {
        TransportError::Connect { .. } => ErrorKind::Timeout,
        TransportError::Receive { deadline_elapsed: true, .. } => ErrorKind::Timeout,
        TransportError::Receive { deadline_elapsed: false, .. } => ErrorKind::ServiceUnavailable,
        TransportError::Internal { .. } => ErrorKind::InternalServer,
    };
    GatewayError::new(kind).with_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::HEADER_LENGTH;

    static TABLE: ErrorTable = ErrorTable::new(&[
        ("SVC105", ErrorKind::RequiredParameter),
        ("SVC117", ErrorKind::IdCardNotFound),
        ("SVC902", ErrorKind::SystemIUnavailable),
    ]);

    fn response(code: &str, message: &str) -> Vec<char> {
        let mut text = " ".repeat(67);
        text.push_str(&format!("{:<6}{:<50}", code, message));
        text.push_str("BODY");
        assert_eq!(text.chars().count(), HEADER_LENGTH + 4);
        text.chars().collect()
    }

    #[test]
    fn svc117_is_record_not_found_and_keeps_raw_text() {
        let err = classify(&response("SVC117", "ID CARD NOT FOUND IN SYSTEM"), &TABLE)
            .unwrap()
            .unwrap();
        assert_eq!(err.kind, ErrorKind::IdCardNotFound);
        assert_eq!(err.code(), "COM067");
        let raw = err.downstream.unwrap();
        assert_eq!(raw.code, "SVC117");
        assert_eq!(raw.message, "ID CARD NOT FOUND IN SYSTEM");
    }

    #[test]
    fn blank_status_is_success() {
        assert!(classify(&response("", ""), &TABLE).unwrap().is_none());
    }

    #[test]
    fn unknown_code_is_unexpected_downstream() {
        let err = classify_status("SVC999", "SOMETHING ODD", &TABLE).unwrap();
        assert_eq!(err.kind, ErrorKind::UnexpectedDownstream);
        assert_eq!(err.client_message(), "System-I Unexpected error occurred");
        assert_eq!(err.downstream.unwrap().code, "SVC999");
    }

    #[test]
    fn short_response_is_protocol_error() {
        let short: Vec<char> = "SYSI".chars().collect();
        assert!(classify(&short, &TABLE).is_err());
    }

    #[test]
    fn transport_failures_map_by_tag() {
        let connect = TransportError::Connect { address: "a:1".into(), reason: "refused".into() };
        let deadline = TransportError::Receive { address: "a:1".into(), reason: "late".into(), deadline_elapsed: true };
        let closed = TransportError::Receive { address: "a:1".into(), reason: "eof".into(), deadline_elapsed: false };
        let internal = TransportError::Internal { address: "a".into(), reason: "bad".into() };

        assert_eq!(classify_transport_failure(connect).kind, ErrorKind::Timeout);
        assert_eq!(classify_transport_failure(deadline).kind, ErrorKind::Timeout);
        assert_eq!(classify_transport_failure(closed).kind, ErrorKind::ServiceUnavailable);
        assert_eq!(classify_transport_failure(internal).kind, ErrorKind::InternalServer);
    }
}
