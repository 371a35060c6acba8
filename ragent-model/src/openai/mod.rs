//! OpenAI-compatible chat completions.
//!
//! Works against the official OpenAI API and any gateway that implements the
//! same `/chat/completions` protocol, including DashScope's compatible mode
//! for Qwen models.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragent_model::openai::{OpenAIClient, OpenAIConfig};
//!
//! let qwen = OpenAIClient::new(OpenAIConfig::dashscope(
//!     std::env::var("DASHSCOPE_API_KEY").unwrap(),
//!     "qwen-plus",
//! ))?;
//! ```

mod client;
mod config;
mod convert;

pub use client::OpenAIClient;
pub use config::{
    DASHSCOPE_CN_API_BASE, DASHSCOPE_INTL_API_BASE, DEFAULT_DASHSCOPE_MODEL, OPENAI_API_BASE,
    OpenAIConfig,
};
