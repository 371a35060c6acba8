//! Subcommand bodies, independent of argument parsing.

use std::path::Path;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use ragent_agent::AgentLoop;
use ragent_core::{CompletionRequest, Llm, Message};
use ragent_rag::{EmbeddingProvider, RagAnswer, RagEngine, VectorIndex, load_segments};
use tracing::info;

use crate::console::TurnHandler;

pub const DEFAULT_CHAT_PERSONA: &str = "You are a helpful expert on Cloud Computing.";
pub const DEFAULT_CHAT_PROMPT: &str = "Explain the concept of \"Serverless\" to a 10-year-old.";

/// Send one system + user exchange with no tools and return the reply text.
pub async fn run_chat(llm: &dyn Llm, system: &str, prompt: &str) -> Result<String> {
    let request = CompletionRequest::new(vec![Message::system(system), Message::user(prompt)]);
    let response = llm.complete(request).await?;
    Ok(response.message.content_text().to_string())
}

/// Segment and embed a document.
///
/// Fails before touching the embedding provider if the document has no text.
pub async fn index_document(
    provider: &dyn EmbeddingProvider,
    path: impl AsRef<Path>,
) -> Result<VectorIndex> {
    let path = path.as_ref();
    let segments: Vec<_> = load_segments(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .collect();
    if segments.is_empty() {
        bail!("no text found in {}", path.display());
    }

    let total = segments.len();
    let index = VectorIndex::build(provider, segments).await?;
    info!(indexed = index.len(), total, "document indexed");
    Ok(index)
}

/// Answer text followed by the pages it was drawn from.
pub fn format_rag_answer(answer: &RagAnswer) -> String {
    let sources: Vec<&str> =
        answer.context.iter().map(|hit| hit.segment.provenance_label.as_str()).collect();
    if sources.is_empty() {
        answer.answer.clone()
    } else {
        format!("{}\n(source: {})", answer.answer, sources.join(", "))
    }
}

/// Console turns answered from an indexed document.
pub struct RagHandler {
    engine: RagEngine,
}

impl RagHandler {
    pub fn new(engine: RagEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl TurnHandler for RagHandler {
    async fn handle(&mut self, input: &str) -> Result<String> {
        let answer = self.engine.answer(input).await?;
        Ok(format_rag_answer(&answer))
    }
}

/// Console turns answered by the tool-using agent.
pub struct AgentHandler {
    agent: AgentLoop,
}

impl AgentHandler {
    pub fn new(agent: AgentLoop) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl TurnHandler for AgentHandler {
    async fn handle(&mut self, input: &str) -> Result<String> {
        let reply = self.agent.run_turn(input).await?;
        for result in &reply.tool_results {
            info!(tool = %result.function_name, is_error = result.is_error, "tool used");
        }
        Ok(reply.answer)
    }
}
