//! Validation of the caller's `{question, topK?}` input.
//!
//! The chat endpoint and the HTTP route both hand us untyped JSON, so a
//! non-string question has to be rejected here rather than by serde.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::DEFAULT_TOP_K;

/// A validated retrieval request: the question is non-blank and `top_k >= 1`.
///
/// Fields are private so every instance goes through [`RetrievalRequest::with_top_k`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalRequest {
    question: String,
    top_k: usize,
}

impl RetrievalRequest {
    /// Build a request with the default `top_k`.
    pub fn new(question: impl Into<String>) -> Result<Self> {
        Self::with_top_k(question, DEFAULT_TOP_K)
    }

    pub fn with_top_k(question: impl Into<String>, top_k: usize) -> Result<Self> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(Error::InvalidInput(
                "question must be a non-empty string".into(),
            ));
        }
        if top_k == 0 {
            return Err(Error::InvalidInput(
                "topK must be a positive integer".into(),
            ));
        }
        Ok(Self { question, top_k })
    }

    /// Parse `{"question": string, "topK"?: positive integer}`.
    ///
    /// `default_top_k` applies when `topK` is absent or `null`.
    pub fn from_json(value: &Value, default_top_k: usize) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::InvalidInput("request body must be a JSON object".into()))?;

        let question = match obj.get("question") {
            None | Some(Value::Null) => {
                return Err(Error::InvalidInput("question is required".into()))
            }
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(Error::InvalidInput(format!(
                    "question must be a string, got {}",
                    json_kind(other)
                )))
            }
        };

        let top_k = match obj.get("topK") {
            None | Some(Value::Null) => default_top_k,
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|k| usize::try_from(k).ok())
                .ok_or_else(|| {
                    Error::InvalidInput(format!("topK must be a positive integer, got {n}"))
                })?,
            Some(other) => {
                return Err(Error::InvalidInput(format!(
                    "topK must be a positive integer, got {}",
                    json_kind(other)
                )))
            }
        };

        Self::with_top_k(question, top_k)
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
