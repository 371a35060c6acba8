//! # ragent-core
//!
//! Shared vocabulary for the ragent crates.
//!
//! - [`Message`], [`ToolCall`], [`ToolResult`]: the conversation records
//! - [`Conversation`]: the append-only log a turn is built on
//! - [`Llm`]: the completion-client contract implemented by `ragent-model`
//! - [`RagentError`]: completion, timeout, and configuration failures

pub mod conversation;
pub mod error;
pub mod llm;
pub mod message;

pub use conversation::Conversation;
pub use error::{RagentError, Result};
pub use llm::{
    CompletionRequest, CompletionResponse, FinishReason, Llm, ToolChoice, ToolDeclaration, Usage,
};
pub use message::{Message, Role, ToolCall, ToolResult};
