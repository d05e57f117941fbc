use syllabus_core::config::Config;
use syllabus_core::traits::Embedder;
use syllabus_embed::get_default_embedder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Config::load()?.settings()?;
    let embedder = get_default_embedder(&settings.embedding)?;
    let text = std::env::args().nth(1).unwrap_or_else(|| "When is the final exam?".to_string());
    let v = embedder.embed(&text).await?;
    println!("model={} dim={} head={:?}", embedder.model_id(), v.len(), &v[..v.len().min(4)]);
    Ok(())
}
