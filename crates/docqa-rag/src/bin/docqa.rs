//! Command-line front end for docqa-rag
//!
//! Run with: cargo run -p docqa-rag --features cli --bin docqa -- <command>

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docqa_rag::{RagConfig, RagService};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docqa", version, about = "Ask questions about your documents")]
struct Cli {
    /// TOML configuration file (environment variables override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index a .txt, .md, .pdf or .docx file
    Upload {
        /// File to ingest
        path: PathBuf,
    },
    /// Answer a question from the indexed documents
    Ask {
        question: String,
        /// Passages to retrieve (defaults to processing.default_top_k)
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// List indexed documents
    List,
    /// Remove a document from the index
    Delete {
        filename: String,
    },
    /// Show collaborator status
    Status,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docqa_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = RagConfig::load(cli.config.as_deref())?;
    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - Chunk size: {} (overlap {})", config.chunking.chunk_size, config.chunking.chunk_overlap);
    tracing::info!("  - Index: {}", config.vector_db.storage_path.display());

    let service = RagService::from_config(config)?;

    match cli.command {
        Command::Upload { path } => {
            let result = service.upload(&path).await;
            print_json(&result)?;
            if !result.is_success() {
                std::process::exit(1);
            }
        }
        Command::Ask { question, top_k } => {
            let result = match top_k {
                Some(top_k) => service.ask(&question, top_k).await,
                None => service.ask_default(&question).await,
            };
            print_json(&result)?;
            if result.is_error() {
                std::process::exit(1);
            }
        }
        Command::List => {
            print_json(&service.list_documents().await?)?;
        }
        Command::Delete { filename } => {
            print_json(&service.delete_document(&filename).await)?;
        }
        Command::Status => {
            print_json(&service.system_status().await)?;
        }
    }

    Ok(())
}
