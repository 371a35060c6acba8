//! The completion-client contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::message::{Message, ToolCall};

/// An advertised tool: name, description, and JSON Schema for its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// How the model may use the advertised tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoice {
    /// The model decides whether a tool is warranted.
    #[default]
    Auto,
    /// The model must answer in text.
    None,
    /// The model must call the named tool.
    Function(String),
}

/// A chat completion request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDeclaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

impl CompletionRequest {
    /// A request without tools.
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages, tools: Vec::new(), tool_choice: None }
    }

    /// Advertise `tools` with the given choice policy. An empty tool list
    /// leaves the request tool-free.
    pub fn with_tools(mut self, tools: Vec<ToolDeclaration>, choice: ToolChoice) -> Self {
        if !tools.is_empty() {
            self.tools = tools;
            self.tool_choice = Some(choice);
        }
        self
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    ToolCalls,
    MaxTokens,
    Other,
}

impl FinishReason {
    pub fn from_provider(reason: &str) -> Self {
        match reason {
            "stop" => FinishReason::Stop,
            "tool_calls" | "function_call" => FinishReason::ToolCalls,
            "length" => FinishReason::MaxTokens,
            _ => FinishReason::Other,
        }
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The assistant's reply to a [`CompletionRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Always role `assistant`: either final text or tool calls.
    pub message: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    pub fn new(message: Message) -> Self {
        Self { message, finish_reason: None, usage: None }
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        &self.message.tool_calls
    }
}

/// A hosted or local chat model.
///
/// Implementations perform exactly one provider round trip per
/// [`complete`](Llm::complete) call and never return partial results.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Model identifier, used in logs.
    fn name(&self) -> &str;

    /// Send a conversation and wait for the assistant's reply.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}
