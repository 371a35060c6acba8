//! OpenAI client implementation.

use async_trait::async_trait;
use ragent_core::{CompletionRequest, CompletionResponse, Llm, RagentError, Result};
use tracing::{debug, error, instrument};

use super::config::OpenAIConfig;
use super::convert;

const PROVIDER: &str = "OpenAI";

/// Client for the OpenAI chat completions API and OpenAI-compatible APIs
/// (DashScope compatible mode, vLLM, Ollama, ...).
///
/// # Example
///
/// ```rust,ignore
/// use ragent_model::openai::{OpenAIClient, OpenAIConfig};
///
/// let model = OpenAIClient::new(OpenAIConfig::dashscope(api_key, "qwen-plus"))?;
/// let reply = model.complete(request).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    http: reqwest::Client,
    config: OpenAIConfig,
    endpoint: String,
}

impl OpenAIClient {
    /// Create a new OpenAI client.
    ///
    /// # Errors
    ///
    /// Returns [`RagentError::Config`] if the API key is empty or the HTTP
    /// client cannot be built.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(RagentError::Config("API key must not be empty".into()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| RagentError::Config(format!("failed to build HTTP client: {e}")))?;

        let endpoint = config.chat_completions_url();
        Ok(Self { http, config, endpoint })
    }

    /// Create a client for an OpenAI-compatible API.
    pub fn compatible(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        Self::new(OpenAIConfig::compatible(api_key, base_url, model))
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn transport_error(&self, e: reqwest::Error) -> RagentError {
        match self.config.timeout {
            Some(after) if e.is_timeout() => {
                RagentError::Timeout { operation: "chat completion".into(), after }
            }
            _ => RagentError::completion(PROVIDER, format!("request failed: {e}")),
        }
    }
}

#[async_trait]
impl Llm for OpenAIClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    #[instrument(
        skip(self, request),
        fields(model = %self.config.model, messages = request.messages.len())
    )]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!(tools = request.tools.len(), "sending chat completion");

        let body = convert::to_chat_request(&self.config, &request);
        let mut http_request = self.http.post(&self.endpoint).bearer_auth(&self.config.api_key);
        if let Some(org) = &self.config.organization_id {
            http_request = http_request.header("OpenAI-Organization", org);
        }

        let response = http_request.json(&body).send().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "request failed");
            self.transport_error(e)
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = convert::error_detail(body);

            error!(provider = PROVIDER, %status, "API error");
            return Err(RagentError::completion(
                PROVIDER,
                format!("API returned {status}: {detail}"),
            ));
        }

        let chat_response: convert::ChatResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            RagentError::completion(PROVIDER, format!("failed to parse response: {e}"))
        })?;

        let completion = convert::from_chat_response(chat_response)
            .ok_or_else(|| RagentError::completion(PROVIDER, "API returned no choices"))?;

        debug!(
            tool_calls = completion.tool_calls().len(),
            finish_reason = ?completion.finish_reason,
            "chat completion received"
        );
        Ok(completion)
    }
}
