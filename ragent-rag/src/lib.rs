//! # ragent-rag
//!
//! Single-document retrieval-augmented generation.
//!
//! A document is split into one [`Segment`] per non-blank page, every segment
//! is embedded once into a flat [`VectorIndex`], and a [`RagEngine`] answers
//! questions from the best-matching page(s).
//!
//! ## Features
//!
//! - `openai` (default) - [`OpenAIEmbeddingProvider`](openai::OpenAIEmbeddingProvider)
//!   for OpenAI-compatible `/embeddings` endpoints, DashScope included
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragent_rag::{RagEngine, VectorIndex, load_segments, openai::OpenAIEmbeddingProvider};
//!
//! let embedder = Arc::new(OpenAIEmbeddingProvider::dashscope(api_key)?);
//! let index = VectorIndex::build(embedder.as_ref(), load_segments("manual.pdf")?).await?;
//! let engine = RagEngine::builder()
//!     .embedding_provider(embedder)
//!     .llm(llm)
//!     .index(Arc::new(index))
//!     .build()?;
//! println!("{}", engine.answer("What is covered by the warranty?").await?.answer);
//! ```

pub mod config;
pub mod document;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod index;
#[cfg(feature = "openai")]
pub mod openai;
pub mod segmenter;

pub use config::{RagConfig, RagConfigBuilder};
pub use document::{SearchResult, Segment};
pub use embedding::{EmbeddingProvider, normalize_input};
pub use engine::{RagAnswer, RagEngine, RagEngineBuilder, build_prompt};
pub use error::{RagError, Result};
pub use index::{Similarity, VectorIndex};
pub use segmenter::{DocumentFormat, Pages, Segments, load_segments, open_pages, segment_pages};
