//! Error types for the `ragent-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in RAG operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// The source document does not exist or cannot be opened.
    #[error("Document not found: {}", path.display())]
    ResourceNotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The document exists but its contents could not be read.
    #[error("Document error: {0}")]
    DocumentError(String),

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// No segment survived indexing, so there is nothing to search.
    #[error("Index is empty: no segment could be embedded")]
    EmptyIndex,

    /// A vector does not match the index dimensionality.
    #[error("Dimension mismatch: index has {expected} dimensions, vector has {actual}")]
    DimensionMismatch {
        /// Dimensionality of the index.
        expected: usize,
        /// Dimensionality of the offending vector.
        actual: usize,
    },

    /// The query could not be turned into a search vector.
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A completion failure or timeout propagated from `ragent-core`.
    #[error(transparent)]
    Core(#[from] ragent_core::RagentError),
}

impl RagError {
    pub(crate) fn embedding(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingError { provider: provider.into(), message: message.into() }
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
