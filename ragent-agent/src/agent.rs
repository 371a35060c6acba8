//! The two-round tool-use protocol.
//!
//! Each turn runs through three states:
//!
//! 1. **Decide**: send the conversation with the tool declarations and
//!    `tool_choice = auto`.
//! 2. **Dispatch**: if the model asked for tools, echo its request into the
//!    conversation and append one tool message per call, in request order.
//! 3. **Finalize**: after a dispatch, ask again without tools and return that
//!    answer; otherwise the decide response already is the answer.

use std::sync::Arc;

use futures::future::join_all;
use ragent_core::{
    CompletionRequest, CompletionResponse, Conversation, Llm, Message, ToolCall, ToolChoice,
    ToolResult,
};
use ragent_tool::ToolDispatcher;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::config::{AgentConfig, HistoryPolicy, ToolExecution};
use crate::error::{AgentError, Result};

/// The outcome of one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    /// Final assistant text.
    pub answer: String,
    /// One entry per tool call, in the order the model issued them.
    pub tool_results: Vec<ToolResult>,
    /// Completion requests issued during the turn: 1 or 2.
    pub completion_calls: usize,
}

/// A tool-augmented conversational agent.
///
/// # Example
///
/// ```rust,ignore
/// let mut agent = AgentLoop::builder()
///     .llm(Arc::new(client))
///     .dispatcher(ToolDispatcher::new())
///     .build()?;
///
/// let reply = agent.run_turn("What's the weather in Singapore?").await?;
/// println!("{}", reply.answer);
/// ```
pub struct AgentLoop {
    llm: Arc<dyn Llm>,
    dispatcher: ToolDispatcher,
    config: AgentConfig,
    history: Conversation,
}

impl AgentLoop {
    pub fn builder() -> AgentLoopBuilder {
        AgentLoopBuilder::default()
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// The committed conversation. Only grows under [`HistoryPolicy::Retain`].
    pub fn history(&self) -> &Conversation {
        &self.history
    }

    /// Drop retained history, keeping only the system instruction.
    pub fn reset(&mut self) {
        self.history = Conversation::with_system(&self.config.instruction);
    }

    fn start_turn(&self, input: &str) -> Conversation {
        let mut conversation = match self.config.history {
            HistoryPolicy::Reset => Conversation::with_system(&self.config.instruction),
            HistoryPolicy::Retain => self.history.clone(),
        };
        conversation.push(Message::user(input));
        conversation
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.llm.complete(request).await.map_err(|e| {
            error!(llm = self.llm.name(), error = %e, "completion failed");
            AgentError::from(e)
        })
    }

    async fn dispatch_all(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        match self.config.tool_execution {
            ToolExecution::Sequential => {
                let mut results = Vec::with_capacity(calls.len());
                for call in calls {
                    results.push(self.dispatcher.dispatch(call).await);
                }
                results
            }
            // join_all yields outputs in input order regardless of completion order.
            ToolExecution::Concurrent => {
                join_all(calls.iter().map(|call| self.dispatcher.dispatch(call))).await
            }
        }
    }

    /// Run one user turn.
    ///
    /// Tool failures are contained in the returned tool results. Under
    /// [`HistoryPolicy::Retain`] a failed turn leaves the history untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Completion`] if either completion request fails.
    #[instrument(skip_all, fields(llm = self.llm.name(), input_len = input.len()))]
    pub async fn run_turn(&mut self, input: &str) -> Result<AgentReply> {
        let mut conversation = self.start_turn(input);

        // Decide
        let request = CompletionRequest::new(conversation.messages().to_vec())
            .with_tools(self.dispatcher.declarations(), ToolChoice::Auto);
        let decision = self.complete(request).await?;

        if !decision.message.has_tool_calls() {
            let answer = decision.message.content_text().to_string();
            conversation.push(decision.message);
            self.commit(conversation);
            info!(completion_calls = 1, "turn answered without tools");
            return Ok(AgentReply { answer, tool_results: Vec::new(), completion_calls: 1 });
        }

        // Dispatch
        let calls = decision.message.tool_calls.clone();
        debug!(
            tool_calls = calls.len(),
            tools = ?calls.iter().map(|c| c.function_name.as_str()).collect::<Vec<_>>(),
            "dispatching tool calls"
        );
        conversation.push(decision.message);

        let tool_results = self.dispatch_all(&calls).await;
        for result in &tool_results {
            conversation.push(result.clone());
        }

        // Finalize
        let request = CompletionRequest::new(conversation.messages().to_vec());
        let response = self.complete(request).await?;
        let answer = response.message.content_text().to_string();
        conversation.push(response.message);
        self.commit(conversation);

        info!(
            completion_calls = 2,
            failed_tools = tool_results.iter().filter(|r| r.is_error).count(),
            "turn answered with tools"
        );
        Ok(AgentReply { answer, tool_results, completion_calls: 2 })
    }

    fn commit(&mut self, conversation: Conversation) {
        if self.config.history == HistoryPolicy::Retain {
            self.history = conversation;
        }
    }
}

/// Builder for constructing an [`AgentLoop`].
///
/// `llm` is required. The dispatcher defaults to [`ToolDispatcher::new()`]
/// and the configuration to [`AgentConfig::default()`].
#[derive(Default)]
pub struct AgentLoopBuilder {
    llm: Option<Arc<dyn Llm>>,
    dispatcher: Option<ToolDispatcher>,
    config: Option<AgentConfig>,
}

impl AgentLoopBuilder {
    pub fn llm(mut self, llm: Arc<dyn Llm>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn dispatcher(mut self, dispatcher: ToolDispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the [`AgentLoop`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Config`] if no model is set or the instruction is blank.
    pub fn build(self) -> Result<AgentLoop> {
        let llm = self.llm.ok_or_else(|| AgentError::Config("llm is required".to_string()))?;
        let config = self.config.unwrap_or_default();
        if config.instruction.trim().is_empty() {
            return Err(AgentError::Config("instruction must not be empty".to_string()));
        }
        let history = Conversation::with_system(&config.instruction);

        Ok(AgentLoop {
            llm,
            dispatcher: self.dispatcher.unwrap_or_default(),
            config,
            history,
        })
    }
}
