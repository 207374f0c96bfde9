//! Error types for the Cambio quote pipeline.

use thiserror::Error;

/// Main error type for Cambio operations.
///
/// Every error is terminal for the operation that produced it: there is no
/// local recovery and no retry anywhere in the pipeline.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Malformed call setup (bad URL, unbuildable request). Programmer
    /// error, should not occur in steady state.
    #[error("Request construction failed: {0}")]
    RequestConstruction(String),

    /// Network failure reaching a remote peer, or the peer answered with an
    /// unusable status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The operation's budget ran out before it completed.
    #[error("Deadline exceeded during {0}")]
    DeadlineExceeded(String),

    /// Response did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Persistence store unreachable or statement failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Local artifact write failed (requester only).
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl QuoteError {
    /// Check whether this error is a budget expiry rather than a failure of
    /// the operation itself.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, QuoteError::DeadlineExceeded(_))
    }
}

/// Result type alias for Cambio operations.
pub type Result<T> = std::result::Result<T, QuoteError>;
