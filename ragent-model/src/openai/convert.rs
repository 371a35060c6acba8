//! Conversion between ragent types and the OpenAI chat completions wire format.

use ragent_core::{
    CompletionRequest, CompletionResponse, FinishReason, Message, Role, ToolCall, ToolChoice,
    ToolDeclaration, Usage,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::config::OpenAIConfig;

// ── Request types ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct WireToolCall<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionCall<'a>,
}

#[derive(Debug, Serialize)]
struct WireFunctionCall<'a> {
    name: &'a str,
    arguments: &'a str,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction<'a>,
}

#[derive(Debug, Serialize)]
struct WireFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

// ── Response types ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    id: String,
    function: ResponseFunctionCall,
}

#[derive(Debug, Deserialize)]
struct ResponseFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── Conversions ────────────────────────────────────────────────────

fn message_to_wire(message: &Message) -> WireMessage<'_> {
    WireMessage {
        role: message.role.as_str(),
        content: message.content.as_deref(),
        tool_calls: message
            .tool_calls
            .iter()
            .map(|call| WireToolCall {
                id: &call.id,
                kind: "function",
                function: WireFunctionCall { name: &call.function_name, arguments: &call.arguments },
            })
            .collect(),
        tool_call_id: message.tool_call_id.as_deref(),
        name: message.name.as_deref(),
    }
}

fn tool_to_wire(tool: &ToolDeclaration) -> WireTool<'_> {
    WireTool {
        kind: "function",
        function: WireFunction {
            name: &tool.name,
            description: &tool.description,
            parameters: &tool.parameters,
        },
    }
}

fn tool_choice_to_wire(choice: &ToolChoice) -> Value {
    match choice {
        ToolChoice::Auto => json!("auto"),
        ToolChoice::None => json!("none"),
        ToolChoice::Function(name) => json!({ "type": "function", "function": { "name": name } }),
    }
}

/// Build the request body for `config.model`.
pub(crate) fn to_chat_request<'a>(
    config: &'a OpenAIConfig,
    request: &'a CompletionRequest,
) -> ChatRequest<'a> {
    ChatRequest {
        model: &config.model,
        messages: request.messages.iter().map(message_to_wire).collect(),
        tools: request.tools.iter().map(tool_to_wire).collect(),
        tool_choice: if request.tools.is_empty() {
            None
        } else {
            request.tool_choice.as_ref().map(tool_choice_to_wire)
        },
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

/// Convert the first choice of a provider response.
///
/// Returns `None` when the provider sent no choices.
pub(crate) fn from_chat_response(response: ChatResponse) -> Option<CompletionResponse> {
    let usage = response.usage.map(|u| Usage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });
    let choice = response.choices.into_iter().next()?;

    let tool_calls: Vec<ToolCall> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| ToolCall::new(call.id, call.function.name, call.function.arguments))
        .collect();

    let message = Message {
        role: Role::Assistant,
        content: choice.message.content,
        tool_calls,
        tool_call_id: None,
        name: None,
    };

    Some(CompletionResponse {
        message,
        finish_reason: choice.finish_reason.as_deref().map(FinishReason::from_provider),
        usage,
    })
}

/// Pull the human-readable message out of an error body, falling back to the raw body.
pub(crate) fn error_detail(body: String) -> String {
    serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body)
}
