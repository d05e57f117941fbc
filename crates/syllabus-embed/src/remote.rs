//! Hosted embedding client for OpenAI-compatible `/v1/embeddings` endpoints.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use syllabus_core::config::EmbeddingSettings;
use syllabus_core::traits::Embedder;
use syllabus_core::{Error, Result};

use crate::retry::{execute_with_retry, RetryPolicy};

/// Longest slice of an error body echoed back in messages.
const MAX_ERROR_BODY: usize = 512;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

/// One failed attempt, classified for the retry loop.
#[derive(Debug)]
struct AttemptError {
    message: String,
    retryable: bool,
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl AttemptError {
    fn transient(message: String) -> Self {
        Self {
            message,
            retryable: true,
        }
    }

    fn permanent(message: String) -> Self {
        Self {
            message,
            retryable: false,
        }
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

pub struct RemoteEmbedder {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    id: String,
    retry: RetryPolicy,
}

impl RemoteEmbedder {
    /// Build a client from settings, resolving the credential from the
    /// environment. Fails with [`Error::Configuration`] when it is absent.
    pub fn new(settings: &EmbeddingSettings) -> Result<Self> {
        let api_key = settings.resolve_api_key()?;
        Self::with_api_key(settings, api_key)
    }

    pub fn with_api_key(settings: &EmbeddingSettings, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Configuration("embedding API credential is empty".into()));
        }
        let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(10));
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;
        let retry = RetryPolicy::default()
            .with_max_retries(settings.max_retries)
            .with_base_delay(Duration::from_millis(settings.retry_base_delay_ms));
        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            api_key,
            model: settings.model.clone(),
            id: format!("openai:{}", settings.model),
            retry,
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn request_once(&self, text: &str) -> std::result::Result<Vec<f32>, AttemptError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AttemptError::transient(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    AttemptError::transient(format!("connection failed: {e}"))
                } else {
                    AttemptError::transient(format!("HTTP request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            let message = format!("HTTP {status}: {body}");
            return Err(if is_transient_status(status) {
                AttemptError::transient(message)
            } else {
                AttemptError::permanent(message)
            });
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AttemptError::permanent(format!("malformed embedding response: {e}")))?;
        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AttemptError::permanent("embedding response contained no data".into()))?;
        if embedding.is_empty() {
            return Err(AttemptError::permanent(
                "embedding response contained an empty vector".into(),
            ));
        }
        if embedding.iter().any(|x| !x.is_finite()) {
            return Err(AttemptError::permanent(
                "embedding response contained non-finite values".into(),
            ));
        }
        Ok(embedding)
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    fn model_id(&self) -> &str {
        &self.id
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        tracing::debug!(model = %self.model, chars = text.len(), "requesting query embedding");
        execute_with_retry(&self.retry, |_| self.request_once(text), |e: &AttemptError| e.retryable)
            .await
            .map_err(|e| Error::EmbeddingService(e.message))
    }
}
