use syllabus_core::types::{Chunk, ScoredChunk};
use syllabus_core::{Error, Result};

use crate::similarity::cosine_similarity;

/// Score used for ordering: non-finite values count as 0.0 and `-0.0` is
/// folded into `0.0`, so `total_cmp` agrees with numeric equality.
fn sort_key(similarity: f32) -> f32 {
    if similarity.is_finite() {
        similarity + 0.0
    } else {
        0.0
    }
}

/// Score every chunk against `query` and keep the `top_k` best.
///
/// The sort is stable, so chunks with equal similarity keep corpus order.
/// `top_k` larger than the corpus returns the whole corpus, sorted. Fails with
/// [`Error::DimensionMismatch`] when the query length differs from any chunk.
pub fn rank(query: &[f32], chunks: &[Chunk], top_k: usize) -> Result<Vec<ScoredChunk>> {
    if let Some(bad) = chunks.iter().find(|c| c.embedding.len() != query.len()) {
        return Err(Error::DimensionMismatch {
            expected: bad.embedding.len(),
            actual: query.len(),
        });
    }

    let mut scored: Vec<ScoredChunk> = chunks
        .iter()
        .map(|c| {
            let similarity = sort_key(cosine_similarity(query, &c.embedding));
            ScoredChunk::from_chunk(c, similarity)
        })
        .collect();
    scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    scored.truncate(top_k);

    tracing::debug!(
        candidates = chunks.len(),
        returned = scored.len(),
        best = scored.first().map(|c| c.similarity),
        "ranked chunks"
    );
    Ok(scored)
}
