//! TCP transport to System I.
//!
//! # Responsibilities
//! - Open one socket per call, bounded by the dial timeout
//! - Transcode to TIS-620, frame, write, read, transcode back
//! - Bound the whole write + read exchange with one deadline
//! - Tag every failure as Connect, Receive or Internal
//!
//! # Design Decisions
//! - No pooling or reuse; the socket drops (and closes) on every exit path
//! - No interpretation of payload contents here; status codes are the
//!   error translator's concern
//! - The `Transport` trait is the seam for test doubles

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::codec::tis620;
use crate::config::{Framing, TransportConfig};
use crate::net::connection::ConnectionTracker;
use crate::net::framing::{read_frame, write_frame, FrameError, FrameLimits};
use crate::observability::metrics;
use crate::routing::Endpoint;

/// Coarse failure class attached by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureTag {
    /// Dial or write failed.
    Connect,
    /// Read failed, peer closed early, or the exchange deadline elapsed.
    Receive,
    /// Unusable address or an oversized frame.
    Internal,
}

impl FailureTag {
    /// Legacy tag code used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            FailureTag::Connect => "ER040",
            FailureTag::Receive => "ER060",
            FailureTag::Internal => "ER099",
        }
    }
}

impl std::fmt::Display for FailureTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A failed System I exchange.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("[ER040] {address}: {reason}")]
    Connect { address: String, reason: String },

    #[error("[ER060] {address}: {reason}")]
    Receive { address: String, reason: String, deadline_elapsed: bool },

    #[error("[ER099] {address}: {reason}")]
    Internal { address: String, reason: String },
}

impl TransportError {
    pub fn tag(&self) -> FailureTag {
        match self {
            TransportError::Connect { .. } => FailureTag::Connect,
            TransportError::Receive { .. } => FailureTag::Receive,
            TransportError::Internal { .. } => FailureTag::Internal,
        }
    }

    pub fn address(&self) -> &str {
        match self {
            TransportError::Connect { address, .. }
            | TransportError::Receive { address, .. }
            | TransportError::Internal { address, .. } => address,
        }
    }

    fn connect(address: &str, reason: impl Into<String>) -> Self {
        TransportError::Connect { address: address.to_string(), reason: reason.into() }
    }

    fn receive(address: &str, reason: impl Into<String>, deadline_elapsed: bool) -> Self {
        TransportError::Receive { address: address.to_string(), reason: reason.into(), deadline_elapsed }
    }

    fn internal(address: &str, reason: impl Into<String>) -> Self {
        TransportError::Internal { address: address.to_string(), reason: reason.into() }
    }
}

/// Sends one request message and returns the response message.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_and_receive(&self, endpoint: &Endpoint, request: &str) -> Result<String, TransportError>;
}

/// Production transport over plain TCP.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    dial_timeout: Duration,
    io_timeout: Duration,
    limits: FrameLimits,
    tracker: ConnectionTracker,
}

impl TcpTransport {
    pub fn new(config: &TransportConfig) -> Self {
        Self::with_timeouts(
            config.dial_timeout(),
            config.io_timeout(),
            FrameLimits {
                unframed_buffer: config.unframed_buffer_bytes,
                max_frame: config.max_frame_bytes,
            },
        )
    }

    pub fn with_timeouts(dial_timeout: Duration, io_timeout: Duration, limits: FrameLimits) -> Self {
        Self { dial_timeout, io_timeout, limits, tracker: ConnectionTracker::new() }
    }

    /// Open-socket tracker, shared by clones of this transport.
    pub fn tracker(&self) -> &ConnectionTracker {
        &self.tracker
    }

    async fn dial(&self, address: &str) -> Result<TcpStream, TransportError> {
        match timeout(self.dial_timeout, TcpStream::connect(address)).await {
            Err(_) => Err(TransportError::connect(
                address,
                format!("dial timed out after {:?}", self.dial_timeout),
            )),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::InvalidInput => {
                Err(TransportError::internal(address, format!("unusable address: {}", e)))
            }
            Ok(Err(e)) => Err(TransportError::connect(address, format!("dial failed: {}", e))),
            Ok(Ok(stream)) => Ok(stream),
        }
    }

    async fn exchange(
        &self,
        stream: &mut TcpStream,
        address: &str,
        framing: Framing,
        payload: &[u8],
    ) -> Result<Vec<u8>, TransportError> {
        write_frame(stream, framing, payload)
            .await
            .map_err(|e| TransportError::connect(address, format!("write failed: {}", e)))?;

        read_frame(stream, framing, self.limits).await.map_err(|e| match e {
            FrameError::TooLarge { .. } => TransportError::internal(address, e.to_string()),
            FrameError::Io(_) | FrameError::Closed { .. } => TransportError::receive(address, e.to_string(), false),
        })
    }

    async fn call(&self, endpoint: &Endpoint, request: &str) -> Result<String, TransportError> {
        let address = endpoint.address.as_str();
        let payload = tis620::to_legacy(request);

        let mut stream = self.dial(address).await?;
        let _lease = self.tracker.track(address);

        let response = match timeout(self.io_timeout, self.exchange(&mut stream, address, endpoint.framing, &payload)).await {
            Err(_) => {
                return Err(TransportError::receive(
                    address,
                    format!("deadline of {:?} exceeded", self.io_timeout),
                    true,
                ))
            }
            Ok(result) => result?,
        };

        tracing::debug!(address, sent = payload.len(), received = response.len(), "System I exchange complete");
        Ok(tis620::to_native(&response))
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send_and_receive(&self, endpoint: &Endpoint, request: &str) -> Result<String, TransportError> {
        let result = self.call(endpoint, request).await;
        if let Err(ref e) = result {
            metrics::record_transport_failure(e.tag().code());
            tracing::warn!(address = %endpoint.address, tag = %e.tag(), error = %e, "System I transport failure");
        }
        result
    }
}
