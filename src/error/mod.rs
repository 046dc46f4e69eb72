//! Client-facing errors.
//!
//! # Data Flow
//! ```text
//! ConfigurationError (routing)  ──┐
//! ProtocolError (codec)         ──┤
//! TransportError (net)          ──┼→ GatewayError { kind, downstream, source }
//! backend status code (classify)──┤        → {"Code", "Message"} + HTTP status
//! request validation (http)     ──┘
//! ```
//!
//! # Design Decisions
//! - `ErrorKind` is closed; every kind has one stable client code
//! - Raw backend codes, messages and addresses travel only in
//!   `downstream`/`source` for logs, never into the client body

pub mod classify;

pub use classify::{classify, classify_status, classify_transport_failure, ErrorTable};

use crate::codec::ProtocolError;
use crate::routing::ConfigurationError;

/// Where in the call a failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Transport,
    Protocol,
    DownstreamBusiness,
    UnexpectedDownstream,
    Request,
}

/// Every error a client can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    ServiceUnavailable,
    Timeout,
    InternalServer,
    /// A request value wider than its System I field.
    FieldTooLong,
    RequiredParameter,
    IdCardNotFound,
    SueInfoNotFound,
    AgreementNotFound,
    SystemIUnavailable,
    UnexpectedDownstream,
    Unauthorized,
    InvalidRequestId,
    InvalidChannel,
    InvalidDeviceOs,
    Validation,
}

impl ErrorKind {
    /// Stable client-facing code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "CFG500",
            ErrorKind::ServiceUnavailable => "SYS001",
            ErrorKind::Timeout => "SYS003",
            ErrorKind::InternalServer | ErrorKind::FieldTooLong => "SYS500",
            ErrorKind::RequiredParameter => "COM001",
            ErrorKind::IdCardNotFound => "COM067",
            ErrorKind::SueInfoNotFound => "COL001",
            ErrorKind::AgreementNotFound => "UHP003",
            ErrorKind::SystemIUnavailable => "SYS008",
            ErrorKind::UnexpectedDownstream => "SYS009",
            ErrorKind::Unauthorized => "SYS002",
            ErrorKind::InvalidRequestId => "COM033",
            ErrorKind::InvalidChannel => "COM002",
            ErrorKind::InvalidDeviceOs => "COM034",
            ErrorKind::Validation => "VAL400",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "Application configuration error",
            ErrorKind::ServiceUnavailable => "System unavailable",
            ErrorKind::Timeout => "System Time out",
            ErrorKind::InternalServer => "An unexpected internal error occurred",
            ErrorKind::FieldTooLong => "An unexpected internal error occurred: max length",
            ErrorKind::RequiredParameter => "Required Parameter",
            ErrorKind::IdCardNotFound => "ID Card No. Not Found",
            ErrorKind::SueInfoNotFound => "SUE Information Not Found",
            ErrorKind::AgreementNotFound => "Agreement No. Not Found",
            ErrorKind::SystemIUnavailable => "System-I Unavailable",
            ErrorKind::UnexpectedDownstream => "System-I Unexpected error occurred",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::InvalidRequestId => "Invalid Api-RequestID",
            ErrorKind::InvalidChannel => "Invalid Api-Channel",
            ErrorKind::InvalidDeviceOs => "Invalid Api-DeviceOS",
            ErrorKind::Validation => "Invalid input provided",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::Configuration => ErrorCategory::Configuration,
            ErrorKind::ServiceUnavailable | ErrorKind::Timeout => ErrorCategory::Transport,
            ErrorKind::InternalServer => ErrorCategory::Protocol,
            ErrorKind::RequiredParameter
            | ErrorKind::IdCardNotFound
            | ErrorKind::SueInfoNotFound
            | ErrorKind::AgreementNotFound
            | ErrorKind::SystemIUnavailable => ErrorCategory::DownstreamBusiness,
            ErrorKind::UnexpectedDownstream => ErrorCategory::UnexpectedDownstream,
            ErrorKind::Unauthorized
            | ErrorKind::InvalidRequestId
            | ErrorKind::InvalidChannel
            | ErrorKind::InvalidDeviceOs
            | ErrorKind::FieldTooLong
            | ErrorKind::Validation => ErrorCategory::Request,
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::Configuration | ErrorKind::InternalServer | ErrorKind::FieldTooLong => 500,
            ErrorKind::ServiceUnavailable => 502,
            ErrorKind::Timeout => 504,
            ErrorKind::Unauthorized => 401,
            _ => 400,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code(), self.message())
    }
}

/// Status code and message as System I sent them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownstreamStatus {
    pub code: String,
    pub message: String,
}

/// A failed request, ready to be rendered for the client.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct GatewayError {
    pub kind: ErrorKind,

    /// Appended to the client message, e.g. the names of missing fields.
    pub detail: Option<String>,

    /// Raw backend status, for logs only.
    pub downstream: Option<DownstreamStatus>,

    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl GatewayError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, detail: None, downstream: None, source: None }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_downstream(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.downstream = Some(DownstreamStatus { code: code.into(), message: message.into() });
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Message shown to the client.
    pub fn client_message(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{} {}", self.kind.message(), detail),
            None => self.kind.message().to_string(),
        }
    }
}

impl From<ErrorKind> for GatewayError {
    fn from(kind: ErrorKind) -> Self {
        GatewayError::new(kind)
    }
}

impl From<ConfigurationError> for GatewayError {
    fn from(e: ConfigurationError) -> Self {
        GatewayError::new(ErrorKind::Configuration).with_source(e)
    }
}

impl From<ProtocolError> for GatewayError {
    fn from(e: ProtocolError) -> Self {
        GatewayError::new(ErrorKind::InternalServer).with_source(e)
    }
}

impl From<crate::net::TransportError> for GatewayError {
    fn from(e: crate::net::TransportError) -> Self {
        classify_transport_failure(e)
    }
}
