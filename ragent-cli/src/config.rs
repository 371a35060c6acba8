//! Provider settings shared by every subcommand.

use std::time::Duration;

use clap::Args;
use ragent_model::OpenAIConfig;
use ragent_rag::openai::OpenAIEmbeddingProvider;

pub const DEFAULT_BASE_URL: &str = "https://dashscope-intl.aliyuncs.com/compatible-mode/v1";
pub const DEFAULT_CHAT_MODEL: &str = "qwen-plus";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-v3";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1024;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Credentials and endpoints for the OpenAI-compatible provider.
#[derive(Debug, Clone, Args)]
pub struct ProviderArgs {
    /// API key for the provider
    #[arg(long, env = "DASHSCOPE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// OpenAI-compatible API root
    #[arg(long, env = "RAGENT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Chat completion model
    #[arg(long, env = "RAGENT_CHAT_MODEL", default_value = DEFAULT_CHAT_MODEL)]
    pub chat_model: String,

    /// Embedding model
    #[arg(long, env = "RAGENT_EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,

    /// Requested embedding dimensionality
    #[arg(long, env = "RAGENT_EMBEDDING_DIMENSIONS", default_value_t = DEFAULT_EMBEDDING_DIMENSIONS)]
    pub embedding_dimensions: usize,

    /// Timeout for each provider request, in seconds
    #[arg(long, env = "RAGENT_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl ProviderArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn chat_config(&self) -> OpenAIConfig {
        OpenAIConfig::compatible(&self.api_key, &self.base_url, &self.chat_model)
            .with_timeout(self.timeout())
    }

    pub fn embedding_provider(&self) -> ragent_rag::Result<OpenAIEmbeddingProvider> {
        OpenAIEmbeddingProvider::new(&self.api_key)?
            .with_base_url(&self.base_url)
            .with_model(&self.embedding_model)
            .with_dimensions(self.embedding_dimensions)
            .with_timeout(self.timeout())
    }
}
