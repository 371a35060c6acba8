//! Error types for the `ragent-agent` crate.

use thiserror::Error;

/// Errors that abort an agent turn.
///
/// Tool failures never appear here: they are reported to the model as
/// error-bearing tool results.
#[derive(Debug, Error)]
pub enum AgentError {
    /// A completion request failed or timed out.
    #[error(transparent)]
    Completion(#[from] ragent_core::RagentError),

    /// The agent was built with missing or invalid settings.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;
