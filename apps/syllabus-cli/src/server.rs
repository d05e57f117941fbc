//! HTTP surface for retrieval.
//!
//! - `POST /api/rag`: `{question, topK?}` in, `{topChunks, context, question}` out
//! - `GET /health`: liveness plus the configured corpus and embedder
//!
//! Failures are returned as `{"error": {"code", "message"}}` with the status
//! taken from [`syllabus_core::Error::http_status`].

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use syllabus_core::config::ServerSettings;
use syllabus_core::types::RetrievalResult;
use syllabus_rag::Retriever;

/// Upper bound on a whole request, embedding call included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Retrieval(#[from] syllabus_core::Error),

    #[error("Not found")]
    NotFound,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Retrieval(e) => {
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::Retrieval(e) => e.code(),
            ApiError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "retrieval request failed");
        }
        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));
        (status, body).into_response()
    }
}

pub fn build_router(retriever: Arc<Retriever>) -> Router {
    Router::new()
        .route("/api/rag", post(rag))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(retriever)
}

/// The body is parsed by hand so malformed JSON gets the same error shape as
/// any other invalid input.
async fn rag(
    State(retriever): State<Arc<Retriever>>,
    body: Bytes,
) -> Result<Json<RetrievalResult>, ApiError> {
    let input: Value = serde_json::from_slice(&body).map_err(|e| {
        syllabus_core::Error::InvalidInput(format!("request body is not valid JSON: {e}"))
    })?;
    let result = retriever.retrieve_json(&input).await?;
    tracing::info!(returned = result.top_chunks.len(), "retrieval served");
    Ok(Json(result))
}

async fn health(State(retriever): State<Arc<Retriever>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "syllabus-server",
        "version": env!("CARGO_PKG_VERSION"),
        "corpus": retriever.store().path().display().to_string(),
        "embedder": retriever.embedder().model_id(),
    }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn serve(retriever: Arc<Retriever>, settings: &ServerSettings) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    let app = build_router(retriever);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "syllabus server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("received ctrl-c, shutting down");
}
