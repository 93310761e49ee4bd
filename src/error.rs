//! Error types for the host bridge and payload parsing

use thiserror::Error;

/// Failures while handing an event to the transport
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The host side of the channel has gone away
    #[error("Transport channel closed")]
    ChannelClosed,
    #[error("Transport I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failures while reading a status payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Status payload is not well-formed markup: {0}")]
    Markup(String),
}
