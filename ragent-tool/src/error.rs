//! Error types for the `ragent-tool` crate.

use std::time::Duration;

use serde_json::{Value, json};
use thiserror::Error;

/// Why a tool call could not produce a result.
///
/// The variants are kept apart so that a tool the model was never offered
/// ([`Resolution`](Self::Resolution)) is not confused with a tool that ran and
/// failed ([`Execution`](Self::Execution)).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    /// The requested name is not a registered tool.
    #[error("Unknown tool: {name}")]
    Resolution { name: String },

    /// The arguments did not decode into the tool's argument record.
    #[error("Invalid arguments for {tool}: {message}")]
    ArgumentValidation { tool: String, message: String },

    /// The tool ran and reported a failure.
    #[error("Tool {tool} failed: {message}")]
    Execution { tool: String, message: String },

    /// The tool did not finish within the dispatcher's time limit.
    #[error("Tool {tool} timed out after {after:?}")]
    Timeout { tool: String, after: Duration },
}

impl ToolError {
    pub fn execution(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution { tool: tool.into(), message: message.into() }
    }

    /// Stable identifier for the failure class, used in serialized results.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Resolution { .. } => "resolution",
            ToolError::ArgumentValidation { .. } => "argument_validation",
            ToolError::Execution { .. } => "execution",
            ToolError::Timeout { .. } => "timeout",
        }
    }

    /// The payload handed back to the model in place of a result.
    pub fn to_payload(&self) -> Value {
        json!({ "error": self.to_string(), "kind": self.kind() })
    }
}
