//! Loading and validating the precomputed chunk corpus.
//!
//! The artifact is a JSON array of `{chunk_id, text, embedding}` records
//! produced offline. Every failure is reported as
//! [`Error::CorpusUnavailable`] naming the file and, where it applies, the
//! offending record.

use std::path::Path;

use serde_json::Value;

use syllabus_core::types::Chunk;
use syllabus_core::{Error, Result};

/// A validated corpus: every chunk has non-empty text and a finite embedding
/// of the same dimensionality.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    chunks: Vec<Chunk>,
    dim: Option<usize>,
}

impl Corpus {
    /// Validate `chunks` in order. The first record fixes the dimensionality.
    pub fn new(chunks: Vec<Chunk>) -> std::result::Result<Self, String> {
        let mut dim = None;
        for (i, c) in chunks.iter().enumerate() {
            if c.text.trim().is_empty() {
                return Err(format!("record {i} (chunk_id {}): text is empty", c.chunk_id));
            }
            if c.embedding.is_empty() {
                return Err(format!("record {i} (chunk_id {}): embedding is empty", c.chunk_id));
            }
            if let Some(pos) = c.embedding.iter().position(|x| !x.is_finite()) {
                return Err(format!(
                    "record {i} (chunk_id {}): embedding[{pos}] is not finite",
                    c.chunk_id
                ));
            }
            match dim {
                None => dim = Some(c.embedding.len()),
                Some(d) if d != c.embedding.len() => {
                    return Err(format!(
                        "record {i} (chunk_id {}): embedding has {} dimensions, expected {d}",
                        c.chunk_id,
                        c.embedding.len()
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(Self { chunks, dim })
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Embedding dimensionality, `None` for an empty corpus.
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Read and validate the corpus at `path`.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::corpus(path, format!("cannot read file: {e}")))?;
    let corpus = parse_corpus(&raw).map_err(|reason| Error::corpus(path, reason))?;
    tracing::debug!(
        path = %path.display(),
        chunks = corpus.len(),
        dim = ?corpus.dim(),
        "loaded corpus"
    );
    Ok(corpus)
}

/// Parse corpus JSON. Records are decoded one by one so a bad record can be
/// reported by position.
pub fn parse_corpus(raw: &str) -> std::result::Result<Corpus, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))?;
    let Value::Array(records) = value else {
        return Err("expected a JSON array of chunk records".into());
    };
    let chunks = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            serde_json::from_value::<Chunk>(record).map_err(|e| format!("record {i}: {e}"))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Corpus::new(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_records() {
        let corpus = parse_corpus(
            r#"[{"chunk_id": 1, "text": "Grading policy", "embedding": [0.1, 0.2]},
                {"chunk_id": 2, "text": "Office hours", "embedding": [0.3, 0.4]}]"#,
        )
        .unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.dim(), Some(2));
        assert_eq!(corpus.chunks()[1].text, "Office hours");
    }

    #[test]
    fn empty_array_is_an_empty_corpus() {
        let corpus = parse_corpus("[]").unwrap();
        assert!(corpus.is_empty());
        assert_eq!(corpus.dim(), None);
    }

    #[test]
    fn rejects_non_array() {
        let err = parse_corpus(r#"{"chunk_id": 1}"#).unwrap_err();
        assert!(err.contains("array"), "{err}");
    }

    #[test]
    fn names_the_record_with_a_missing_field() {
        let err = parse_corpus(
            r#"[{"chunk_id": 1, "text": "a", "embedding": [1.0]}, {"chunk_id": 2, "text": "b"}]"#,
        )
        .unwrap_err();
        assert!(err.starts_with("record 1:"), "{err}");
        assert!(err.contains("embedding"), "{err}");
    }

    #[test]
    fn rejects_non_integer_chunk_id() {
        let err =
            parse_corpus(r#"[{"chunk_id": "x", "text": "a", "embedding": [1.0]}]"#).unwrap_err();
        assert!(err.starts_with("record 0:"), "{err}");
    }

    #[test]
    fn rejects_non_numeric_embedding() {
        let err = parse_corpus(r#"[{"chunk_id": 1, "text": "a", "embedding": [1.0, "two"]}]"#)
            .unwrap_err();
        assert!(err.starts_with("record 0:"), "{err}");
    }

    #[test]
    fn rejects_empty_text_and_embedding() {
        let err =
            parse_corpus(r#"[{"chunk_id": 7, "text": "  ", "embedding": [1.0]}]"#).unwrap_err();
        assert!(err.contains("chunk_id 7") && err.contains("text"), "{err}");
        let err =
            parse_corpus(r#"[{"chunk_id": 8, "text": "a", "embedding": []}]"#).unwrap_err();
        assert!(err.contains("chunk_id 8") && err.contains("embedding is empty"), "{err}");
    }

    #[test]
    fn rejects_overflowing_values() {
        let err = parse_corpus(r#"[{"chunk_id": 1, "text": "a", "embedding": [1.0, 1e300]}]"#)
            .unwrap_err();
        assert!(err.contains("embedding[1] is not finite"), "{err}");
    }

    #[test]
    fn rejects_ragged_dimensions() {
        let err = parse_corpus(
            r#"[{"chunk_id": 1, "text": "a", "embedding": [1.0, 0.0]},
                {"chunk_id": 2, "text": "b", "embedding": [1.0, 0.0, 0.0]}]"#,
        )
        .unwrap_err();
        assert!(err.contains("record 1") && err.contains("expected 2"), "{err}");
    }

    #[test]
    fn missing_file_is_corpus_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        match load_corpus(&path) {
            Err(Error::CorpusUnavailable { path: p, reason }) => {
                assert_eq!(p, path);
                assert!(reason.contains("cannot read"), "{reason}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
