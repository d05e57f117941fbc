use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds surfaced by the retrieval core.
///
/// Callers that must not fail (the chat turn) match on these to degrade
/// gracefully; HTTP surfaces map them with [`Error::http_status`].
#[derive(Debug, Error)]
pub enum Error {
    /// The caller sent a missing, non-string or empty question, or a bad `topK`.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Required configuration (typically the embedding credential) is absent or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The remote embedding call failed: network, status, quota or response shape.
    #[error("embedding service error: {0}")]
    EmbeddingService(String),

    /// The corpus file is missing, unreadable or does not match the chunk schema.
    #[error("corpus unavailable at {}: {reason}", .path.display())]
    CorpusUnavailable { path: PathBuf, reason: String },

    /// The query embedding and the corpus embeddings disagree on dimensionality.
    #[error("embedding dimension mismatch: corpus has {expected}, query has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl Error {
    pub fn corpus(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorpusUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for structured error responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::EmbeddingService(_) => "EMBEDDING_SERVICE_ERROR",
            Self::CorpusUnavailable { .. } => "CORPUS_UNAVAILABLE",
            Self::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
        }
    }

    /// HTTP status an HTTP-style caller should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::EmbeddingService(_) => 502,
            Self::Configuration(_)
            | Self::CorpusUnavailable { .. }
            | Self::DimensionMismatch { .. } => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.http_status() < 500
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_error_names_path_and_reason() {
        let err = Error::corpus("data/corpus.json", "No such file or directory");
        let msg = err.to_string();
        assert!(msg.contains("data/corpus.json"));
        assert!(msg.contains("No such file"));
        assert_eq!(err.code(), "CORPUS_UNAVAILABLE");
    }

    #[test]
    fn only_invalid_input_is_a_client_error() {
        assert!(Error::InvalidInput("question is required".into()).is_client_error());
        assert!(!Error::Configuration("OPENAI_API_KEY is not set".into()).is_client_error());
        assert!(!Error::EmbeddingService("HTTP 503".into()).is_client_error());
        assert!(!Error::corpus("x.json", "bad").is_client_error());
        let mismatch = Error::DimensionMismatch {
            expected: 3,
            actual: 2,
        };
        assert!(!mismatch.is_client_error());
    }

    #[test]
    fn status_mapping() {
        assert_eq!(Error::InvalidInput(String::new()).http_status(), 400);
        assert_eq!(Error::EmbeddingService(String::new()).http_status(), 502);
        assert_eq!(Error::Configuration(String::new()).http_status(), 500);
    }

    #[test]
    fn dimension_mismatch_display() {
        let err = Error::DimensionMismatch {
            expected: 1536,
            actual: 384,
        };
        assert_eq!(err.to_string(), "embedding dimension mismatch: corpus has 1536, query has 384");
    }
}
