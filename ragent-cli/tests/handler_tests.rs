//! Subcommand bodies driven by [`MockLlm`] and an in-test embedder.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use ragent_agent::AgentLoop;
use ragent_cli::{AgentHandler, RagHandler, TurnHandler, index_document, run_chat};
use ragent_core::Role;
use ragent_model::MockLlm;
use ragent_rag::{EmbeddingProvider, RagEngine};
use ragent_tool::ToolDispatcher;

const VOCABULARY: [&str; 3] = ["invoice", "warranty", "shipping"];

struct KeywordEmbedder;

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> ragent_rag::Result<Vec<f32>> {
        let text = text.to_lowercase();
        Ok(VOCABULARY.iter().map(|word| text.matches(word).count() as f32).collect())
    }

    fn dimensions(&self) -> usize {
        VOCABULARY.len()
    }
}

fn text_document(pages: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(pages.join("\x0c").as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn chat_sends_persona_and_prompt_without_tools() {
    let llm = MockLlm::new("mock").with_text("Serverless means someone else runs the computer.");

    let reply = run_chat(&llm, "You are a helpful expert on Cloud Computing.", "Explain serverless.")
        .await
        .unwrap();

    assert_eq!(reply, "Serverless means someone else runs the computer.");
    let request = &llm.requests()[0];
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.messages[1].role, Role::User);
    assert!(request.tools.is_empty());
}

#[tokio::test]
async fn chat_reports_completion_failure() {
    let llm = MockLlm::new("mock").with_error("401 invalid api key");
    assert!(run_chat(&llm, "persona", "hi").await.is_err());
}

#[tokio::test]
async fn rag_handler_answers_with_source_page() {
    let document = text_document(&[
        "Shipping takes five days.",
        "Every invoice is due within 30 days.",
        "The warranty lasts two years.",
    ]);
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(KeywordEmbedder);
    let index = index_document(embedder.as_ref(), document.path()).await.unwrap();
    assert_eq!(index.len(), 3);

    let llm = Arc::new(MockLlm::new("mock").with_text("Within 30 days."));
    let engine = RagEngine::builder()
        .embedding_provider(embedder)
        .llm(llm.clone())
        .index(Arc::new(index))
        .build()
        .unwrap();
    let mut handler = RagHandler::new(engine);

    let output = handler.handle("When is an invoice due?").await.unwrap();
    assert_eq!(output, "Within 30 days.\n(source: Page 2)");
}

#[tokio::test]
async fn blank_document_is_rejected_before_indexing() {
    let document = text_document(&["   ", "\n"]);
    let err = index_document(&KeywordEmbedder, document.path()).await.unwrap_err();
    assert!(err.to_string().contains("no text found"));
}

#[tokio::test]
async fn missing_document_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("manual.pdf");
    assert!(index_document(&KeywordEmbedder, &missing).await.is_err());
}

#[tokio::test]
async fn agent_handler_returns_final_answer() {
    let llm = Arc::new(
        MockLlm::new("mock")
            .with_tool_call("calculate", serde_json::json!({"operation": "multiply", "a": 6, "b": 7}))
            .with_text("6 times 7 is 42."),
    );
    let agent =
        AgentLoop::builder().llm(llm.clone()).dispatcher(ToolDispatcher::new()).build().unwrap();
    let mut handler = AgentHandler::new(agent);

    let output = handler.handle("What is 6 times 7?").await.unwrap();

    assert_eq!(output, "6 times 7 is 42.");
    assert_eq!(llm.request_count(), 2);
}
