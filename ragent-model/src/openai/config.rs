//! Configuration for OpenAI-compatible chat endpoints.

use std::time::Duration;

/// The OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// DashScope's OpenAI-compatible gateway (international/Singapore region).
pub const DASHSCOPE_INTL_API_BASE: &str = "https://dashscope-intl.aliyuncs.com/compatible-mode/v1";

/// DashScope's OpenAI-compatible gateway (mainland China region).
pub const DASHSCOPE_CN_API_BASE: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

/// Default chat model on DashScope.
pub const DEFAULT_DASHSCOPE_MODEL: &str = "qwen-plus";

/// Connection settings for an [`OpenAIClient`](super::OpenAIClient).
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model: String,
    /// API root, without the `/chat/completions` suffix.
    pub base_url: String,
    pub organization_id: Option<String>,
    /// Whole-request deadline. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl OpenAIConfig {
    /// Config for the official OpenAI API.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::compatible(api_key, OPENAI_API_BASE, model)
    }

    /// Config for any API that speaks the OpenAI chat completions protocol.
    pub fn compatible(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            organization_id: None,
            timeout: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Config for DashScope's international compatible-mode gateway.
    ///
    /// Keys are region-bound: a key issued for the mainland console must use
    /// [`DASHSCOPE_CN_API_BASE`] instead.
    pub fn dashscope(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::compatible(api_key, DASHSCOPE_INTL_API_BASE, model)
    }

    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Full URL of the chat completions endpoint.
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashscope_uses_international_gateway() {
        let config = OpenAIConfig::dashscope("sk-test", DEFAULT_DASHSCOPE_MODEL);
        assert_eq!(
            config.chat_completions_url(),
            "https://dashscope-intl.aliyuncs.com/compatible-mode/v1/chat/completions"
        );
        assert_eq!(config.model, "qwen-plus");
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let config = OpenAIConfig::compatible("k", "http://localhost:8000/v1/", "m");
        assert_eq!(config.chat_completions_url(), "http://localhost:8000/v1/chat/completions");
    }
}
