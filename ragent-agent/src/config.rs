//! Agent configuration.

use serde::{Deserialize, Serialize};

/// System instruction used when none is configured.
pub const DEFAULT_INSTRUCTION: &str = "You are a helpful assistant. Use tools if needed.";

/// What happens to the conversation between turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// Every turn starts from the system instruction and the new user message.
    #[default]
    Reset,
    /// Successful turns are appended to a log that later turns build on.
    Retain,
}

/// How the tool calls of one response are run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolExecution {
    /// One after another, in request order.
    #[default]
    Sequential,
    /// All at once; results are still appended in request order.
    Concurrent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub instruction: String,
    pub history: HistoryPolicy,
    pub tool_execution: ToolExecution,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            instruction: DEFAULT_INSTRUCTION.to_string(),
            history: HistoryPolicy::default(),
            tool_execution: ToolExecution::default(),
        }
    }
}

impl AgentConfig {
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn with_history(mut self, history: HistoryPolicy) -> Self {
        self.history = history;
        self
    }

    pub fn with_tool_execution(mut self, tool_execution: ToolExecution) -> Self {
        self.tool_execution = tool_execution;
        self
    }
}
