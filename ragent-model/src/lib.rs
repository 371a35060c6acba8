//! # ragent-model
//!
//! Completion clients implementing [`ragent_core::Llm`].
//!
//! - [`OpenAIClient`] - OpenAI and OpenAI-compatible APIs (DashScope/Qwen, vLLM, Ollama)
//! - [`MockLlm`] - scripted responses for tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ragent_model::openai::{OpenAIClient, OpenAIConfig};
//! use std::time::Duration;
//!
//! let model = OpenAIClient::new(
//!     OpenAIConfig::dashscope(std::env::var("DASHSCOPE_API_KEY")?, "qwen-plus")
//!         .with_timeout(Duration::from_secs(60)),
//! )?;
//! ```
//!
//! ## Supported Models
//!
//! | Model | Description |
//! |-------|-------------|
//! | `qwen-plus` | Balanced speed and reasoning (default) |
//! | `qwen-max` | Most capable Qwen model |
//! | `qwen-turbo` | Fast, cost-effective |
//! | `gpt-4o-mini` | Any OpenAI chat model via [`OpenAIConfig::new`](openai::OpenAIConfig::new) |

pub mod mock;
pub mod openai;

pub use mock::MockLlm;
pub use openai::{OpenAIClient, OpenAIConfig};
