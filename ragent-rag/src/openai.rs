//! OpenAI-compatible embedding provider.
//!
//! Talks to any `/embeddings` endpoint that follows the OpenAI protocol,
//! including DashScope's compatible mode (`text-embedding-v3`).
//!
//! This module is only available when the `openai` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::{EmbeddingProvider, normalize_input};
use crate::error::{RagError, Result};

/// The OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// DashScope's OpenAI-compatible gateway (international region).
pub const DASHSCOPE_INTL_API_BASE: &str = "https://dashscope-intl.aliyuncs.com/compatible-mode/v1";

/// The default model for OpenAI embeddings.
const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// The default dimensionality for `text-embedding-3-small`.
const DEFAULT_DIMENSIONS: usize = 1536;

/// DashScope's embedding model.
pub const DASHSCOPE_MODEL: &str = "text-embedding-v3";

/// Dimensionality requested from DashScope.
pub const DASHSCOPE_DIMENSIONS: usize = 1024;

const PROVIDER: &str = "OpenAI";

/// An [`EmbeddingProvider`] backed by an OpenAI-compatible embeddings API.
///
/// Uses `reqwest` to call the `/embeddings` endpoint directly. Every input
/// goes through [`normalize_input`] first.
///
/// # Configuration
///
/// - `model` – defaults to `text-embedding-3-small` (`text-embedding-v3` for [`dashscope`](Self::dashscope)).
/// - `dimensions` – optional Matryoshka dimension override.
/// - `timeout` – optional whole-request deadline.
/// - `api_key` – required, must not be blank.
///
/// # Example
///
/// ```rust,ignore
/// use ragent_rag::openai::OpenAIEmbeddingProvider;
///
/// let provider = OpenAIEmbeddingProvider::dashscope("sk-...")?;
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct OpenAIEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
    /// If set, passed to the API for Matryoshka dimension truncation.
    request_dimensions: Option<usize>,
    timeout: Option<Duration>,
}

impl OpenAIEmbeddingProvider {
    /// Create a new provider with the given API key.
    ///
    /// Uses the default model (`text-embedding-3-small`) and dimensions (1536).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RagError::embedding(PROVIDER, "API key must not be empty"));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: OPENAI_API_BASE.into(),
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            request_dimensions: None,
            timeout: None,
        })
    }

    /// Create a provider for DashScope's `text-embedding-v3` at 1024 dimensions.
    pub fn dashscope(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::new(api_key)?
            .with_base_url(DASHSCOPE_INTL_API_BASE)
            .with_model(DASHSCOPE_MODEL)
            .with_dimensions(DASHSCOPE_DIMENSIONS))
    }

    /// Point the provider at another OpenAI-compatible API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model name (e.g. `text-embedding-3-large`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the output dimensions (Matryoshka support).
    ///
    /// When set, the API returns embeddings truncated to this size.
    /// This also updates the value returned by [`dimensions()`](EmbeddingProvider::dimensions).
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self.request_dimensions = Some(dims);
        self
    }

    /// Fail any request that takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            RagError::ConfigError(format!("failed to build HTTP client: {e}"))
        })?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url.trim_end_matches('/'))
    }

    fn request_body<'a>(&'a self, texts: &[&str]) -> EmbeddingRequest<'a> {
        EmbeddingRequest {
            model: &self.model,
            input: texts.iter().map(|text| normalize_input(text)).collect(),
            dimensions: self.request_dimensions,
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> RagError {
        match self.timeout {
            Some(after) if e.is_timeout() => {
                RagError::embedding(PROVIDER, format!("request timed out after {after:?}"))
            }
            _ => RagError::embedding(PROVIDER, format!("request failed: {e}")),
        }
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = PROVIDER, text_len = text.len(), "embedding single text");

        let results = self.embed_batch(&[text]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| RagError::embedding(PROVIDER, "API returned empty response"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = PROVIDER,
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let request_body = self.request_body(texts);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                self.transport_error(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = PROVIDER, %status, "API error");
            return Err(RagError::embedding(PROVIDER, format!("API returned {status}: {detail}")));
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            RagError::embedding(PROVIDER, format!("failed to parse response: {e}"))
        })?;

        let mut data = embedding_response.data;
        if data.len() != texts.len() {
            return Err(RagError::embedding(
                PROVIDER,
                format!("expected {} embeddings, got {}", texts.len(), data.len()),
            ));
        }
        data.sort_by_key(|d| d.index);

        data.into_iter()
            .map(|d| {
                if d.embedding.is_empty() {
                    Err(RagError::embedding(PROVIDER, "API returned an empty vector"))
                } else {
                    Ok(d.embedding)
                }
            })
            .collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
