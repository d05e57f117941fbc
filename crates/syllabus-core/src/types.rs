//! Domain types shared by the corpus store, the ranker and the pipeline.

use serde::{Deserialize, Serialize};

pub type ChunkId = i64;

/// Default number of chunks returned when the caller does not pass `topK`.
pub const DEFAULT_TOP_K: usize = 4;

/// Separator placed between chunk texts in the assembled context.
pub const CONTEXT_SEPARATOR: &str = "\n---\n";

/// A syllabus passage paired with its precomputed embedding.
///
/// - `chunk_id`: identity of the chunk; uniqueness is assumed, not enforced
/// - `text`: the passage injected into the prompt
/// - `embedding`: vector produced offline by the same model the query uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: ChunkId,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A chunk with its cosine similarity to the query. The embedding is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk_id: ChunkId,
    pub text: String,
    pub similarity: f32,
}

impl ScoredChunk {
    pub fn from_chunk(chunk: &Chunk, similarity: f32) -> Self {
        Self {
            chunk_id: chunk.chunk_id,
            text: chunk.text.clone(),
            similarity,
        }
    }
}

/// What the pipeline hands back to the chat endpoint.
///
/// `top_chunks` is ranked by similarity (non-increasing, ties in corpus order)
/// and `context` is exactly their texts joined with [`CONTEXT_SEPARATOR`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalResult {
    pub top_chunks: Vec<ScoredChunk>,
    pub context: String,
    pub question: String,
}

impl RetrievalResult {
    pub fn chunk_ids(&self) -> Vec<ChunkId> {
        self.top_chunks.iter().map(|c| c.chunk_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.top_chunks.is_empty()
    }
}
