//! Role-tagged conversation messages and the tool-call records they carry.

use serde::{Deserialize, Serialize};

/// The author of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// A model-issued request to run a named tool.
///
/// `arguments` is kept exactly as the model produced it: a JSON-encoded
/// object. Decoding happens at the dispatcher boundary, where a malformed
/// payload becomes an argument-validation failure instead of a panic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned identifier echoed back in the matching tool message.
    pub id: String,
    /// The requested tool name.
    pub function_name: String,
    /// JSON-encoded argument object.
    pub arguments: String,
}

impl ToolCall {
    pub fn new(
        id: impl Into<String>,
        function_name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), function_name: function_name.into(), arguments: arguments.into() }
    }
}

/// The outcome of one [`ToolCall`], ready to be appended as a `tool` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// The id of the call this result answers.
    pub tool_call_id: String,
    /// The tool that was (or was meant to be) run.
    pub function_name: String,
    /// Serialized tool output, or a serialized error description.
    pub content: String,
    /// Whether `content` describes a failure.
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(call: &ToolCall, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            function_name: call.function_name.clone(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn failure(call: &ToolCall, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            function_name: call.function_name.clone(),
            content: content.into(),
            is_error: true,
        }
    }
}

/// One entry in a conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    /// Text content. `None` on assistant messages that only carry tool calls.
    pub content: Option<String>,
    /// Tool calls requested by the assistant, in the order the model issued them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Set on `tool` messages: the call being answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Set on `tool` messages: the tool that produced the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// An assistant message that requests tool execution instead of answering.
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self { role: Role::Assistant, content: None, tool_calls, tool_call_id: None, name: None }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// The text content, or `""` when absent.
    pub fn content_text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

impl From<ToolResult> for Message {
    fn from(result: ToolResult) -> Self {
        Self {
            role: Role::Tool,
            content: Some(result.content),
            tool_calls: Vec::new(),
            tool_call_id: Some(result.tool_call_id),
            name: Some(result.function_name),
        }
    }
}
