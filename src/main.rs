//! # Ragline CLI
//!
//! Ask a question, get one answer line back:
//!
//! ```bash
//! ragline "Why did my deployment fail?"
//! ```
//!
//! Configuration comes from the environment (`LLM_ENDPOINT`, `LLM_API_KEY`,
//! `QDRANT_URL`, `QDRANT_API_KEY`); none of it is required. With nothing
//! configured the answer is the deterministic placeholder built from
//! whatever context could be retrieved. Omitting the query argument is the
//! only hard error and exits non-zero.
//!
//! Diagnostics go to stderr and are controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=ragline=debug`); stdout carries only the answer.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ragline::config::Settings;
use ragline::orchestrator::{Orchestrator, DEFAULT_COLLECTION, DEFAULT_TOP_K};

/// Ragline — retrieval-augmented answers over a Qdrant vector store.
#[derive(Parser)]
#[command(
    name = "ragline",
    about = "Retrieval-augmented answers over a Qdrant vector store",
    version
)]
struct Cli {
    /// Query to ask the assistant.
    query: String,

    /// Collection searched for context.
    #[arg(long, default_value = DEFAULT_COLLECTION)]
    collection: String,

    /// Number of context documents to retrieve.
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    let orchestrator = Orchestrator::connect(&settings)
        .await
        .with_collection(cli.collection)
        .with_top_k(cli.top_k);

    let answer = orchestrator.answer(&cli.query).await;
    println!("{}", answer);

    Ok(())
}
