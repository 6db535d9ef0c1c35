//! Length-prefixed JSON framing for the relay socket.
//!
//! A connection opens with one [`Hello`] frame naming the channel; every
//! later frame is a bare `UpdateAnnouncement` (`{"id":..,"ts":..}`).

use crate::error::{ChannelError, ChannelResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum frame size (64 KiB). Announcements are a few dozen bytes.
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

/// First frame on a relay connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hello {
    /// Channel the connection joins.
    pub channel: String,
}

impl Hello {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }
}

/// Reads one length-prefixed JSON frame.
pub async fn read_frame<T, R>(io: &mut R) -> ChannelResult<T>
where
    T: DeserializeOwned,
    R: AsyncRead + Unpin,
{
    // Read 4-byte length prefix
    let mut len_bytes = [0u8; 4];
    io.read_exact(&mut len_bytes).await?;
    let len = u32::from_be_bytes(len_bytes) as usize;

    if len > MAX_FRAME_SIZE {
        return Err(ChannelError::FrameTooLarge(len));
    }

    let mut buf = vec![0u8; len];
    io.read_exact(&mut buf).await?;

    Ok(serde_json::from_slice(&buf)?)
}

/// Writes one length-prefixed JSON frame and flushes.
pub async fn write_frame<T, W>(io: &mut W, frame: &T) -> ChannelResult<()>
where
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    let data = serde_json::to_vec(frame)?;

    if data.len() > MAX_FRAME_SIZE {
        return Err(ChannelError::FrameTooLarge(data.len()));
    }

    let len_bytes = (data.len() as u32).to_be_bytes();
    io.write_all(&len_bytes).await?;
    io.write_all(&data).await?;
    io.flush().await?;

    Ok(())
}
