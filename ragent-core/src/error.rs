//! Error types shared by every ragent crate.

use std::time::Duration;

use thiserror::Error;

/// Errors raised at the completion-client boundary.
#[derive(Debug, Error)]
pub enum RagentError {
    /// The provider could not be reached or rejected the chat request.
    #[error("Completion error ({provider}): {message}")]
    Completion {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An external call did not finish within its time limit.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        /// The operation that was cut off.
        operation: String,
        /// The configured limit.
        after: Duration,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A payload could not be encoded or decoded.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl RagentError {
    /// Shorthand for a [`RagentError::Completion`].
    pub fn completion(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Completion { provider: provider.into(), message: message.into() }
    }

    /// Returns `true` for transport-level failures that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Completion { .. } | Self::Timeout { .. })
    }
}

/// A convenience result type for core operations.
pub type Result<T> = std::result::Result<T, RagentError>;
