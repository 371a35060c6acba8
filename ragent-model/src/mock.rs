//! Scripted [`Llm`] for tests and offline demos.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use ragent_core::{
    CompletionRequest, CompletionResponse, FinishReason, Llm, Message, RagentError, Result,
    ToolCall,
};
use serde_json::Value;

/// A mock LLM that replays queued responses and records every request.
///
/// Responses are returned in the order they were queued. Once the queue is
/// exhausted, [`complete`](Llm::complete) fails with a completion error, which
/// makes an unexpected extra round trip visible in tests.
///
/// # Example
///
/// ```rust
/// use ragent_model::MockLlm;
///
/// let llm = MockLlm::new("mock")
///     .with_tool_call("get_current_weather", serde_json::json!({ "location": "Tokyo" }))
///     .with_text("It is 18°C and clear in Tokyo.");
/// assert_eq!(llm.pending(), 2);
/// ```
#[derive(Debug)]
pub struct MockLlm {
    name: String,
    responses: Mutex<VecDeque<Result<CompletionResponse>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue an arbitrary response.
    pub fn with_response(self, response: Result<CompletionResponse>) -> Self {
        self.lock_responses().push_back(response);
        self
    }

    /// Queue a final text answer.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        let mut response = CompletionResponse::new(Message::assistant(text));
        response.finish_reason = Some(FinishReason::Stop);
        self.with_response(Ok(response))
    }

    /// Queue an assistant message requesting the given tool calls.
    pub fn with_tool_calls(self, calls: Vec<ToolCall>) -> Self {
        let mut response = CompletionResponse::new(Message::assistant_tool_calls(calls));
        response.finish_reason = Some(FinishReason::ToolCalls);
        self.with_response(Ok(response))
    }

    /// Queue a single tool call with a generated id.
    pub fn with_tool_call(self, name: &str, arguments: Value) -> Self {
        let call = ToolCall::new(
            format!("call_{}", uuid::Uuid::new_v4().simple()),
            name,
            arguments.to_string(),
        );
        self.with_tool_calls(vec![call])
    }

    /// Queue a provider failure.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        let provider = self.name.clone();
        self.with_response(Err(RagentError::completion(provider, message)))
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Number of queued responses not yet consumed.
    pub fn pending(&self) -> usize {
        self.lock_responses().len()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<CompletionResponse>>> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(request);
        self.lock_responses()
            .pop_front()
            .unwrap_or_else(|| Err(RagentError::completion(&self.name, "no scripted response left")))
    }
}
