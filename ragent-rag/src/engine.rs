//! Retrieve-then-generate query engine.
//!
//! The [`RagEngine`] owns a prebuilt [`VectorIndex`] and answers each question
//! independently: embed the question, take the best-matching segment(s), and
//! ask the completion model to answer from that context alone.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragent_rag::{RagEngine, RagConfig, VectorIndex, load_segments};
//!
//! let index = VectorIndex::build(embedder.as_ref(), load_segments("manual.pdf")?).await?;
//! let engine = RagEngine::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(embedder)
//!     .llm(Arc::new(client))
//!     .index(Arc::new(index))
//!     .build()?;
//!
//! let answer = engine.answer("What does the warranty cover?").await?;
//! ```

use std::sync::Arc;

use ragent_core::{CompletionRequest, Llm, Message};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::RagConfig;
use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// The answer to one question together with the context it was generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagAnswer {
    /// The assistant's reply.
    pub answer: String,
    /// Retrieved segments in rank order.
    pub context: Vec<SearchResult>,
}

/// Build the user message for the generate phase.
///
/// Each context segment is pasted verbatim, separated by a blank line.
pub fn build_prompt(context: &[SearchResult], question: &str) -> String {
    let context = context.iter().map(|r| r.segment.text.as_str()).collect::<Vec<_>>().join("\n\n");
    format!(
        "You are a helpful assistant. Use the document content below to answer.\n\n\
         Document content: {context}\n\n\
         Question: {question}"
    )
}

/// The RAG query engine.
///
/// Construct one via [`RagEngine::builder()`]. Holding a built engine means
/// the index is non-empty, so every call to [`answer`](Self::answer) has
/// something to retrieve.
pub struct RagEngine {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn Llm>,
    index: Arc<VectorIndex>,
}

impl RagEngine {
    /// Create a new [`RagEngineBuilder`].
    pub fn builder() -> RagEngineBuilder {
        RagEngineBuilder::default()
    }

    /// Return a reference to the engine configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the index.
    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }

    /// Retrieve phase: embed the question and search the index.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Retrieval`] if the question cannot be embedded or
    /// its embedding does not fit the index.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        let query = self.embedding_provider.embed(question).await.map_err(|e| {
            error!(error = %e, "query embedding failed");
            RagError::Retrieval(format!("query embedding failed: {e}"))
        })?;
        if query.is_empty() {
            error!("query embedding is empty");
            return Err(RagError::Retrieval("query embedding is empty".to_string()));
        }

        let results = self
            .index
            .search_top_k(&query, self.config.similarity, self.config.top_k)
            .map_err(|e| {
                error!(error = %e, "search failed");
                RagError::Retrieval(format!("search failed: {e}"))
            })?;

        info!(
            result_count = results.len(),
            pages = ?results.iter().map(|r| r.segment.page).collect::<Vec<_>>(),
            "retrieved context"
        );
        Ok(results)
    }

    /// The two-message conversation sent in the generate phase.
    pub fn generate_request(&self, context: &[SearchResult], question: &str) -> CompletionRequest {
        CompletionRequest::new(vec![
            Message::system(&self.config.system_instruction),
            Message::user(build_prompt(context, question)),
        ])
    }

    /// Answer one question from the indexed document.
    ///
    /// # Errors
    ///
    /// - [`RagError::Retrieval`] if the retrieve phase fails
    /// - [`RagError::Core`] if the completion call fails or times out
    #[instrument(skip_all, fields(question_len = question.len(), top_k = self.config.top_k))]
    pub async fn answer(&self, question: &str) -> Result<RagAnswer> {
        let context = self.retrieve(question).await?;

        let response = self.llm.complete(self.generate_request(&context, question)).await.map_err(
            |e| {
                error!(llm = self.llm.name(), error = %e, "completion failed");
                RagError::from(e)
            },
        )?;

        let answer = response.message.content_text().to_string();
        info!(answer_len = answer.len(), "answered question");
        Ok(RagAnswer { answer, context })
    }
}

/// Builder for constructing a [`RagEngine`].
///
/// Every field except `config` is required; `config` defaults to
/// [`RagConfig::default()`].
#[derive(Default)]
pub struct RagEngineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    llm: Option<Arc<dyn Llm>>,
    index: Option<Arc<VectorIndex>>,
}

impl RagEngineBuilder {
    /// Set the engine configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the provider used to embed questions. It must be the one that built the index.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the completion model.
    pub fn llm(mut self, llm: Arc<dyn Llm>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Set the prebuilt index.
    pub fn index(mut self, index: Arc<VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the [`RagEngine`].
    ///
    /// # Errors
    ///
    /// - [`RagError::ConfigError`] if a required field is missing or the config is invalid
    /// - [`RagError::EmptyIndex`] if the index has no entries
    pub fn build(self) -> Result<RagEngine> {
        let config = match self.config {
            Some(config) => RagConfig::builder()
                .top_k(config.top_k)
                .similarity(config.similarity)
                .system_instruction(config.system_instruction)
                .build()?,
            None => RagConfig::default(),
        };
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let llm = self.llm.ok_or_else(|| RagError::ConfigError("llm is required".to_string()))?;
        let index =
            self.index.ok_or_else(|| RagError::ConfigError("index is required".to_string()))?;

        if index.is_empty() {
            return Err(RagError::EmptyIndex);
        }

        Ok(RagEngine { config, embedding_provider, llm, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Segment;

    fn result(page: usize, body: &str) -> SearchResult {
        SearchResult { index: page - 1, segment: Segment::from_page(page, body), score: 1.0 }
    }

    #[test]
    fn prompt_embeds_context_then_question() {
        let prompt = build_prompt(&[result(2, "Invoice total: 40 EUR")], "How much?");
        assert_eq!(
            prompt,
            "You are a helpful assistant. Use the document content below to answer.\n\n\
             Document content: [Page 2] Invoice total: 40 EUR\n\n\
             Question: How much?"
        );
    }

    #[test]
    fn multiple_segments_are_separated_by_blank_line() {
        let prompt = build_prompt(&[result(1, "a"), result(3, "b")], "q");
        assert!(prompt.contains("Document content: [Page 1] a\n\n[Page 3] b\n\nQuestion: q"));
    }

    #[test]
    fn builder_requires_collaborators() {
        let err = RagEngine::builder().build().err().unwrap();
        assert!(matches!(err, RagError::ConfigError(msg) if msg.contains("embedding_provider")));
    }
}
