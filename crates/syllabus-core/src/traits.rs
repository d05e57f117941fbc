use async_trait::async_trait;

use crate::error::Result;

/// Turns text into a fixed-dimension vector.
///
/// Implementations are injected into the retrieval pipeline so tests can
/// substitute a deterministic embedder for the hosted one.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Stable identifier for the provider/model (e.g. `openai:text-embedding-3-small`).
    fn model_id(&self) -> &str;

    /// Embed a single non-empty text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
