//! Byte framing for System I sockets.
//!
//! ```text
//! LengthPrefixed:  [len: u32 BE][payload: len bytes]     (both directions)
//! Unframed:        [payload]  /  one read of up to N bytes
//! ```

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::Framing;

/// Size of the big-endian length prefix.
pub const PREFIX_LENGTH: usize = 4;

/// Failure while reading a response frame.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    /// Peer closed before a complete frame arrived.
    #[error("connection closed before {expected} bytes arrived")]
    Closed { expected: usize },

    #[error("declared frame of {length} bytes exceeds the {max} byte limit")]
    TooLarge { length: usize, max: usize },
}

/// Limits applied while reading.
#[derive(Debug, Clone, Copy)]
pub struct FrameLimits {
    /// Buffer for the single unframed read.
    pub unframed_buffer: usize,
    /// Largest accepted length prefix.
    pub max_frame: usize,
}

/// Prefix `payload` with its big-endian length.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(PREFIX_LENGTH + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// Write one request and flush it.
pub async fn write_frame<W>(writer: &mut W, framing: Framing, payload: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    match framing {
        Framing::LengthPrefixed => writer.write_all(&encode_frame(payload)).await?,
        Framing::Unframed => writer.write_all(payload).await?,
    }
    writer.flush().await
}

/// Read one response.
pub async fn read_frame<R>(reader: &mut R, framing: Framing, limits: FrameLimits) -> Result<Vec<u8>, FrameError>
where
    R: AsyncRead + Unpin,
{
    match framing {
        Framing::LengthPrefixed => {
            let mut prefix = [0u8; PREFIX_LENGTH];
            read_full(reader, &mut prefix).await?;
            let length = u32::from_be_bytes(prefix) as usize;
            if length > limits.max_frame {
                return Err(FrameError::TooLarge { length, max: limits.max_frame });
            }
            let mut payload = vec![0u8; length];
            read_full(reader, &mut payload).await?;
            Ok(payload)
        }
        Framing::Unframed => {
            let mut buf = vec![0u8; limits.unframed_buffer];
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                return Err(FrameError::Closed { expected: 1 });
            }
            buf.truncate(n);
            Ok(buf)
        }
    }
}

/// Fill `buf` completely; a short read is an error, not a short result.
async fn read_full<R>(reader: &mut R, buf: &mut [u8]) -> Result<(), FrameError>
where
    R: AsyncRead + Unpin,
{
    match reader.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(FrameError::Closed { expected: buf.len() }),
        Err(e) => Err(e.into()),
    }
}
