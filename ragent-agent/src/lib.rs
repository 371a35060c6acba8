//! # ragent-agent
//!
//! A tool-augmented agent loop. The model decides whether it needs a tool,
//! the [`ToolDispatcher`](ragent_tool::ToolDispatcher) runs every requested
//! call, and a second request turns the tool output into the final answer.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ragent_agent::{AgentConfig, AgentLoop, HistoryPolicy};
//!
//! let mut agent = AgentLoop::builder()
//!     .llm(Arc::new(model))
//!     .config(AgentConfig::default().with_history(HistoryPolicy::Retain))
//!     .build()?;
//! let reply = agent.run_turn("Is it raining in Cairo?").await?;
//! ```

pub mod agent;
pub mod config;
pub mod error;

pub use agent::{AgentLoop, AgentLoopBuilder, AgentReply};
pub use config::{AgentConfig, DEFAULT_INSTRUCTION, HistoryPolicy, ToolExecution};
pub use error::{AgentError, Result};
