//! End-to-end tests for index building and the query engine, using scripted
//! embedders and [`MockLlm`] so no network is involved.

use std::sync::Arc;

use async_trait::async_trait;
use ragent_core::Role;
use ragent_model::MockLlm;
use ragent_rag::{
    EmbeddingProvider, RagConfig, RagEngine, RagError, Segment, VectorIndex, segment_pages,
};

const VOCABULARY: [&str; 4] = ["invoice", "warranty", "shipping", "refund"];

/// Counts vocabulary words, one dimension per word.
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

/// Fails on any text containing `poison`, delegates otherwise.
struct FlakyEmbedder {
    poison: &'static str,
}

#[async_trait]
impl EmbeddingProvider for FlakyEmbedder {
    async fn embed(&self, text: &str) -> ragent_rag::Result<Vec<f32>> {
        if text.contains(self.poison) {
            return Err(RagError::EmbeddingError {
                provider: "flaky".into(),
                message: "connection reset".into(),
            });
        }
        KeywordEmbedder.embed(text).await
    }

    fn dimensions(&self) -> usize {
        VOCABULARY.len()
    }
}

/// Returns an empty vector for texts containing `blank` and an over-long
/// vector for texts containing `wide`, delegates otherwise.
struct MisshapenEmbedder;

#[async_trait]
impl EmbeddingProvider for MisshapenEmbedder {
    async fn embed(&self, text: &str) -> ragent_rag::Result<Vec<f32>> {
        if text.contains("blank") {
            return Ok(Vec::new());
        }
        if text.contains("wide") {
            return Ok(vec![1.0; VOCABULARY.len() + 1]);
        }
        KeywordEmbedder.embed(text).await
    }

    fn dimensions(&self) -> usize {
        VOCABULARY.len()
    }
}

fn three_pages() -> Vec<String> {
    vec![
        "Welcome to the customer handbook. Shipping takes five days.".to_string(),
        "Every invoice is due within 30 days of issue.".to_string(),
        "The warranty covers parts for two years. Refund requests go to support.".to_string(),
    ]
}

async fn engine_with(llm: Arc<MockLlm>, embedder: Arc<dyn EmbeddingProvider>) -> RagEngine {
    let index = VectorIndex::build(embedder.as_ref(), segment_pages(three_pages())).await.unwrap();
    RagEngine::builder().embedding_provider(embedder).llm(llm).index(Arc::new(index)).build().unwrap()
}

#[tokio::test]
async fn invoice_query_retrieves_page_two() {
    let llm = Arc::new(MockLlm::new("mock").with_text("Invoices are due within 30 days."));
    let engine = engine_with(llm.clone(), Arc::new(KeywordEmbedder)).await;

    let answer = engine.answer("invoice").await.unwrap();

    assert_eq!(answer.answer, "Invoices are due within 30 days.");
    assert_eq!(answer.context.len(), 1);
    assert_eq!(answer.context[0].segment.provenance_label, "Page 2");

    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.tools.is_empty());
    assert!(request.tool_choice.is_none());
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.messages[0].content_text(), "You are a helpful assistant.");
    assert_eq!(request.messages[1].role, Role::User);

    let prompt = request.messages[1].content_text();
    assert!(prompt.contains("Document content: [Page 2] Every invoice is due"));
    assert!(prompt.ends_with("Question: invoice"));
}

#[tokio::test]
async fn turns_are_independent() {
    let llm = Arc::new(MockLlm::new("mock").with_text("first").with_text("second"));
    let engine = engine_with(llm.clone(), Arc::new(KeywordEmbedder)).await;

    engine.answer("invoice").await.unwrap();
    let second = engine.answer("warranty").await.unwrap();

    assert_eq!(second.context[0].segment.page, 3);
    let requests = llm.requests();
    assert_eq!(requests[1].messages.len(), 2);
    assert!(!requests[1].messages[1].content_text().contains("Every invoice"));
}

#[tokio::test]
async fn top_k_pastes_ranked_context() {
    let llm = Arc::new(MockLlm::new("mock").with_text("ok"));
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(KeywordEmbedder);
    let index = VectorIndex::build(embedder.as_ref(), segment_pages(three_pages())).await.unwrap();
    let engine = RagEngine::builder()
        .config(RagConfig::builder().top_k(2).build().unwrap())
        .embedding_provider(embedder)
        .llm(llm.clone())
        .index(Arc::new(index))
        .build()
        .unwrap();

    let answer = engine.answer("shipping refund invoice invoice").await.unwrap();

    let pages: Vec<usize> = answer.context.iter().map(|r| r.segment.page).collect();
    assert_eq!(pages, vec![2, 1]);
    let prompt = llm.requests()[0].messages[1].content_text().to_string();
    assert!(prompt.contains("Every invoice is due within 30 days of issue.\n\n[Page 1] Welcome"));
}

#[tokio::test]
async fn failed_segments_are_skipped() {
    let embedder = FlakyEmbedder { poison: "warranty" };
    let index = VectorIndex::build(&embedder, segment_pages(three_pages())).await.unwrap();

    let pages: Vec<usize> = index.segments().iter().map(|s| s.page).collect();
    assert_eq!(pages, vec![1, 2]);
    assert_eq!(index.embeddings().len(), index.len());
}

#[tokio::test]
async fn empty_and_misshapen_embeddings_are_skipped() {
    let pages = vec![
        "Shipping takes five days.".to_string(),
        "This page embeds blank.".to_string(),
        "A wide table of refund codes.".to_string(),
        "Every invoice is due within 30 days.".to_string(),
    ];
    let index = VectorIndex::build(&MisshapenEmbedder, segment_pages(pages)).await.unwrap();

    let kept: Vec<usize> = index.segments().iter().map(|s| s.page).collect();
    assert_eq!(kept, vec![1, 4]);
    assert_eq!(index.dimensions(), VOCABULARY.len());
    assert!(index.embeddings().iter().all(|e| e.len() == VOCABULARY.len()));
}

#[tokio::test]
async fn empty_query_embedding_aborts_the_turn() {
    let llm = Arc::new(MockLlm::new("mock").with_text("unused"));
    let engine = engine_with(llm.clone(), Arc::new(MisshapenEmbedder)).await;

    let err = engine.answer("a blank question").await.unwrap_err();
    assert!(matches!(err, RagError::Retrieval(_)));
    assert_eq!(llm.request_count(), 0);
}

#[tokio::test]
async fn all_embeddings_failing_is_empty_index() {
    let embedder = FlakyEmbedder { poison: "" };
    let err = VectorIndex::build(&embedder, segment_pages(three_pages())).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyIndex));
}

#[tokio::test]
async fn empty_document_is_empty_index() {
    let segments: Vec<Segment> = segment_pages(vec![" ".to_string(), String::new()]).collect();
    assert!(segments.is_empty());

    let err = VectorIndex::build(&KeywordEmbedder, segments).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyIndex));
}

#[tokio::test]
async fn query_embedding_failure_aborts_the_turn_only() {
    let llm = Arc::new(MockLlm::new("mock").with_text("still here"));
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(FlakyEmbedder { poison: "boom" });
    let engine = engine_with(llm.clone(), embedder).await;

    let err = engine.answer("boom").await.unwrap_err();
    assert!(matches!(err, RagError::Retrieval(_)));
    assert_eq!(llm.request_count(), 0);

    let answer = engine.answer("invoice").await.unwrap();
    assert_eq!(answer.answer, "still here");
}

#[tokio::test]
async fn completion_failure_is_reported() {
    let llm = Arc::new(MockLlm::new("mock").with_error("503 Service Unavailable"));
    let engine = engine_with(llm, Arc::new(KeywordEmbedder)).await;

    let err = engine.answer("invoice").await.unwrap_err();
    assert!(matches!(err, RagError::Core(ragent_core::RagentError::Completion { .. })));
}
