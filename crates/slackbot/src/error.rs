//! Dispatch core errors.

use slack_client::SlackError;
use thiserror::Error;

/// Errors raised by the event loop, directory and reply sink.
#[derive(Error, Debug)]
pub enum BotError {
    /// The connection to the gateway could not be established.
    #[error("Failed to connect: {0}")]
    Connect(#[source] SlackError),

    /// The startup directory fetch failed.
    #[error("Failed to load directory: {0}")]
    Directory(String),

    /// A reply could not be delivered.
    #[error("Failed to deliver reply to {channel}: {reason}")]
    Reply { channel: String, reason: String },

    /// The event stream ended.
    #[error("Connection to gateway closed")]
    ConnectionClosed,
}

/// Result type alias for dispatch core errors.
pub type BotResult<T> = Result<T, BotError>;
