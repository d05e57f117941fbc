use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use syllabus_core::config::Config;
use syllabus_core::request::RetrievalRequest;
use syllabus_rag::Retriever;

#[derive(Parser)]
#[command(name = "syllabus-retrieve")]
#[command(version)]
#[command(about = "Retrieve the syllabus passages closest to a question", long_about = None)]
struct Cli {
    /// Question to retrieve context for
    question: String,

    /// Number of passages to return (defaults to retrieval.top_k)
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Corpus JSON file, overriding corpus.path
    #[arg(short, long)]
    corpus: Option<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    syllabus_cli::telemetry::init_cli("info");
    let cli = Cli::parse();

    let mut settings = Config::load()?.settings()?;
    if let Some(path) = &cli.corpus {
        settings.corpus.path = path.to_string_lossy().into_owned();
    }
    let base = std::env::current_dir()?;
    let retriever = Retriever::from_settings(&settings, &base)?;

    let top_k = cli.top_k.unwrap_or(settings.retrieval.top_k);
    let request = RetrievalRequest::with_top_k(cli.question, top_k)?;
    let result = retriever
        .retrieve(&request)
        .await
        .with_context(|| format!("retrieval from {} failed", retriever.store().path().display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Question: {}", result.question);
    println!("Top {} chunk(s):", result.top_chunks.len());
    for (rank, chunk) in result.top_chunks.iter().enumerate() {
        println!("{:>2}. [chunk {}] similarity {:.4}", rank + 1, chunk.chunk_id, chunk.similarity);
        println!("    {}", chunk.text.replace('\n', "\n    "));
    }
    Ok(())
}
