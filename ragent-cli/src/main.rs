use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use ragent_agent::{AgentConfig, AgentLoop, HistoryPolicy, ToolExecution};
use ragent_cli::commands::{DEFAULT_CHAT_PERSONA, DEFAULT_CHAT_PROMPT};
use ragent_cli::{AgentHandler, ProviderArgs, RagHandler, index_document, run_chat, run_console};
use ragent_model::OpenAIClient;
use ragent_rag::{EmbeddingProvider, RagConfig, RagEngine, Similarity};
use ragent_tool::{ToolDispatcher, ToolKind};

#[derive(Parser)]
#[command(name = "ragent", about = "Qwen chat, document Q&A, and a tool-using agent", version)]
struct Cli {
    #[command(flatten)]
    provider: ProviderArgs,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a single prompt and print the reply
    Chat {
        /// User prompt
        #[arg(default_value = DEFAULT_CHAT_PROMPT)]
        prompt: String,
        /// System persona
        #[arg(long, default_value = DEFAULT_CHAT_PERSONA)]
        system: String,
    },

    /// Ask questions about a PDF or text document
    Rag {
        /// Document to index (.pdf, or text with form-feed page breaks)
        document: PathBuf,
        /// Number of pages used as context per question
        #[arg(long, default_value_t = 1)]
        top_k: usize,
        /// Similarity used to rank pages
        #[arg(long, value_enum, default_value_t = SimilarityArg::Dot)]
        similarity: SimilarityArg,
    },

    /// Chat with an agent that can check the weather and do arithmetic
    Agent {
        /// Keep the conversation across turns
        #[arg(long)]
        retain_history: bool,
        /// Run a turn's tool calls concurrently
        #[arg(long)]
        concurrent_tools: bool,
        /// Timeout for each tool call, in seconds
        #[arg(long)]
        tool_timeout_secs: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SimilarityArg {
    Dot,
    Cosine,
}

impl From<SimilarityArg> for Similarity {
    fn from(arg: SimilarityArg) -> Self {
        match arg {
            SimilarityArg::Dot => Similarity::Dot,
            SimilarityArg::Cosine => Similarity::Cosine,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let initialized = if cli.json_logs {
        ragent_telemetry::init_json_telemetry()
    } else {
        ragent_telemetry::init_telemetry()
    };
    if let Err(e) = initialized {
        eprintln!("Warning: logging not initialized: {e}");
    }

    let llm = Arc::new(OpenAIClient::new(cli.provider.chat_config())?);

    match cli.command {
        Command::Chat { prompt, system } => {
            println!("Connecting to {}...", cli.provider.chat_model);
            match run_chat(llm.as_ref(), &system, &prompt).await {
                Ok(reply) => {
                    println!("\n--- {} says: ---", cli.provider.chat_model);
                    println!("{reply}");
                    println!("------------------");
                }
                Err(e) => {
                    eprintln!("Error: {e:#}");
                    eprintln!("Tip: check that the API key matches the region of the base URL.");
                }
            }
        }

        Command::Rag { document, top_k, similarity } => {
            let embedder: Arc<dyn EmbeddingProvider> =
                Arc::new(cli.provider.embedding_provider()?);

            println!("--- Indexing {}... ---", document.display());
            let index = index_document(embedder.as_ref(), &document).await?;
            println!("--- Indexed {} page(s) ---", index.len());

            let config = RagConfig::builder().top_k(top_k).similarity(similarity.into()).build()?;
            let engine = RagEngine::builder()
                .config(config)
                .embedding_provider(embedder)
                .llm(llm)
                .index(Arc::new(index))
                .build()?;

            let mut handler = RagHandler::new(engine);
            run_console(&mut handler, "Document Q&A", "Ask a question about the document.").await?;
        }

        Command::Agent { retain_history, concurrent_tools, tool_timeout_secs } => {
            let mut dispatcher = ToolDispatcher::builder().tools(ToolKind::ALL);
            if let Some(secs) = tool_timeout_secs {
                dispatcher = dispatcher.timeout(Duration::from_secs(secs));
            }

            let config = AgentConfig::default()
                .with_history(if retain_history {
                    HistoryPolicy::Retain
                } else {
                    HistoryPolicy::Reset
                })
                .with_tool_execution(if concurrent_tools {
                    ToolExecution::Concurrent
                } else {
                    ToolExecution::Sequential
                });

            let agent =
                AgentLoop::builder().llm(llm).dispatcher(dispatcher.build()).config(config).build()?;

            let mut handler = AgentHandler::new(agent);
            run_console(
                &mut handler,
                "Qwen Agent",
                "Try: \"What's the weather in Tokyo?\" or \"What is 6 times 7?\"",
            )
            .await?;
        }
    }

    Ok(())
}
