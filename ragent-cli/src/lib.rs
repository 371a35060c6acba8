//! # ragent-cli
//!
//! Building blocks behind the `ragent` binary: provider flags, the
//! interactive console, and the bodies of the `chat`, `rag`, and `agent`
//! subcommands.

pub mod commands;
pub mod config;
pub mod console;

pub use commands::{AgentHandler, RagHandler, format_rag_answer, index_document, run_chat};
pub use config::ProviderArgs;
pub use console::{ConsoleInput, TurnHandler, classify_input, is_exit_command, run_console};
