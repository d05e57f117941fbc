//! syllabus-rag
//!
//! Wires the corpus store, an injected embedder and the ranker into one
//! retrieval call. The embedder is passed in rather than looked up globally,
//! so tests and the server each choose their own.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use syllabus_core::config::{RetrievalSettings, Settings};
use syllabus_core::request::RetrievalRequest;
use syllabus_core::traits::Embedder;
use syllabus_core::types::{RetrievalResult, DEFAULT_TOP_K};
use syllabus_core::Result;
use syllabus_vector::{assemble, rank, CorpusStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrieverOptions {
    /// `top_k` used when the caller leaves `topK` out.
    pub default_top_k: usize,
    pub max_context_chars: Option<usize>,
}

impl Default for RetrieverOptions {
    fn default() -> Self {
        Self {
            default_top_k: DEFAULT_TOP_K,
            max_context_chars: None,
        }
    }
}

impl From<&RetrievalSettings> for RetrieverOptions {
    fn from(s: &RetrievalSettings) -> Self {
        Self {
            default_top_k: s.top_k,
            max_context_chars: s.max_context_chars,
        }
    }
}

pub struct Retriever {
    store: CorpusStore,
    embedder: Arc<dyn Embedder>,
    options: RetrieverOptions,
}

impl Retriever {
    pub fn new(store: CorpusStore, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            store,
            embedder,
            options: RetrieverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RetrieverOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the store and embedder described by `settings`. Relative corpus
    /// paths resolve against `base`.
    pub fn from_settings(settings: &Settings, base: &Path) -> Result<Self> {
        let embedder = syllabus_embed::get_default_embedder(&settings.embedding)?;
        let store = CorpusStore::from_settings(&settings.corpus, base);
        tracing::info!(
            corpus = %store.path().display(),
            cached = store.is_cached(),
            embedder = embedder.model_id(),
            top_k = settings.retrieval.top_k,
            "retriever ready"
        );
        let options = RetrieverOptions::from(&settings.retrieval);
        Ok(Self::new(store, embedder).with_options(options))
    }

    pub fn options(&self) -> RetrieverOptions {
        self.options
    }

    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Load the corpus, embed the question, rank and assemble the context.
    ///
    /// `request` can only be built through its validating constructors, so
    /// the question reaching the embedder is never blank.
    pub async fn retrieve(&self, request: &RetrievalRequest) -> Result<RetrievalResult> {
        let corpus = self.store.load()?;
        let query = self.embedder.embed(request.question()).await?;
        tracing::debug!(
            embedder = self.embedder.model_id(),
            dim = query.len(),
            "embedded question"
        );
        let ranked = rank(&query, corpus.chunks(), request.top_k())?;
        Ok(assemble(
            request.question(),
            ranked,
            self.options.max_context_chars,
        ))
    }

    /// Validate `{question, topK?}` and retrieve. Invalid input fails before
    /// the embedder is called.
    pub async fn retrieve_json(&self, input: &Value) -> Result<RetrievalResult> {
        let request = RetrievalRequest::from_json(input, self.options.default_top_k)?;
        self.retrieve(&request).await
    }

    /// Retrieve with the default `top_k`.
    pub async fn ask(&self, question: &str) -> Result<RetrievalResult> {
        let request = RetrievalRequest::with_top_k(question, self.options.default_top_k)?;
        self.retrieve(&request).await
    }

    /// Entry point for the chat handler: a failed retrieval is logged and the
    /// chat proceeds without syllabus context.
    pub async fn context_or_empty(&self, question: &str) -> Option<RetrievalResult> {
        match self.ask(question).await {
            Ok(result) => Some(result),
            Err(err) => {
                tracing::warn!(
                    code = err.code(),
                    error = %err,
                    "retrieval failed, continuing without context"
                );
                None
            }
        }
    }
}
