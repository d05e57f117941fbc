use async_trait::async_trait;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use syllabus_core::traits::Embedder;
use syllabus_core::Result;

/// Dimension of `text-embedding-3-small`, used so fake vectors line up with a
/// real corpus shape.
pub const FAKE_EMBEDDING_DIM: usize = 1536;

/// Deterministic bag-of-tokens embedder: each whitespace token hashes into one
/// bucket, and the vector is L2-normalized. Identical text yields identical
/// vectors; texts sharing words land close together.
pub struct FakeEmbedder {
    dim: usize,
    id: String,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1), id: format!("fake:d{}", dim.max(1)) }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Synchronous form of [`Embedder::embed`], handy for building fixture corpora.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for token in text.split_whitespace() {
            let token = token.to_lowercase();
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let val = 0.5 + ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += val;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

impl Default for FakeEmbedder {
    fn default() -> Self {
        Self::new(FAKE_EMBEDDING_DIM)
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    fn model_id(&self) -> &str {
        &self.id
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }
}
