//! Configuration for the RAG query engine.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::index::Similarity;

/// System persona sent with every generate request.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful assistant.";

/// Configuration parameters for the RAG query engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Number of segments pasted into the prompt as context.
    pub top_k: usize,
    /// Scoring function for retrieval.
    pub similarity: Similarity,
    /// Content of the system message.
    pub system_instruction: String,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 1,
            similarity: Similarity::Dot,
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set how many segments are retrieved per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the similarity function used for retrieval.
    pub fn similarity(mut self, similarity: Similarity) -> Self {
        self.config.similarity = similarity;
        self
    }

    /// Set the system message content.
    pub fn system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.system_instruction = instruction.into();
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `top_k == 0`
    /// - `system_instruction` is blank
    pub fn build(self) -> Result<RagConfig> {
        if self.config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if self.config.system_instruction.trim().is_empty() {
            return Err(RagError::ConfigError("system_instruction must not be empty".to_string()));
        }
        Ok(self.config)
    }
}
