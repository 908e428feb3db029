//! Error types for alert delivery.

use thiserror::Error;

/// Defines the possible errors that can occur while delivering an alert.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The sender or receiver address could not be parsed.
    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The message could not be assembled.
    #[error("failed to build alert message: {0}")]
    Build(String),

    /// The transport could not be created or refused the message.
    #[error("alert delivery failed: {0}")]
    Transport(String),
}
