//! syllabus-embed
//!
//! Query embedders for the retrieval pipeline: the hosted OpenAI-compatible
//! client used in production and a deterministic fake for tests and offline
//! development. Both implement [`syllabus_core::traits::Embedder`].
use std::sync::Arc;

use syllabus_core::config::{EmbeddingProvider, EmbeddingSettings};
use syllabus_core::traits::Embedder;
use syllabus_core::Result;

pub mod fake;
pub mod remote;
pub mod retry;

pub use fake::{FakeEmbedder, FAKE_EMBEDDING_DIM};
pub use remote::RemoteEmbedder;
pub use retry::RetryPolicy;

/// `APP_USE_FAKE_EMBEDDINGS=1` (or `true`) forces the fake embedder.
pub fn fake_embeddings_requested() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Pick the embedder described by `settings`.
///
/// Fails with [`syllabus_core::Error::Configuration`] when the hosted provider
/// is selected and no credential is available.
pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>> {
    if fake_embeddings_requested() || settings.provider == EmbeddingProvider::Fake {
        tracing::info!(dim = FAKE_EMBEDDING_DIM, "using fake embedder");
        return Ok(Arc::new(FakeEmbedder::default()));
    }
    let embedder = RemoteEmbedder::new(settings)?;
    tracing::info!(model = %settings.model, url = %settings.api_url, "using hosted embedder");
    Ok(Arc::new(embedder))
}
