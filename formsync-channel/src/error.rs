//! Error types for the channel layer.

use thiserror::Error;

/// Result type for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors that can occur in channel operations.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Socket I/O error.
    #[error("network error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Frame exceeds the codec limit.
    #[error("frame too large: {0} bytes")]
    FrameTooLarge(usize),

    /// The outbound side of the transport is gone.
    #[error("channel closed")]
    ChannelClosed,

    /// The shared channel was already created.
    #[error("shared channel already initialized")]
    AlreadyInitialized,

    /// Listening requires a tokio runtime.
    #[error("no tokio runtime available to dispatch updates")]
    NoRuntime,
}
