use std::sync::Arc;

use syllabus_core::config::Config;
use syllabus_rag::Retriever;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    syllabus_cli::telemetry::init_server("info");

    let settings = Config::load()?.settings()?;
    let base = std::env::current_dir()?;
    let retriever = Retriever::from_settings(&settings, &base)?;

    syllabus_cli::server::serve(Arc::new(retriever), &settings.server).await
}
