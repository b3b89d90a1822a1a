//! HTTP surface for the lexsum gateway.
//!
//! This module exposes a compact Axum router:
//!
//! - `POST /upload_pdf/` – Multipart PDF upload; extracts the text, runs the
//!   chunk-and-reduce summarization pipeline, and returns
//!   `{"summary": "<markdown>"}`.
//! - `GET /metrics` – Observe summarization counters.
//! - `GET /health` – Static liveness probe.
//!
//! Per request the upload handler walks a fixed sequence: rate-limit check,
//! content-type check, extraction, summarization, response. Rate-limited
//! callers get HTTP 429 with a fixed message before any other work happens.
//! A wrong content type returns HTTP 200 with an error payload, matching the
//! gateway's published contract. Provider failures never fail the request:
//! once extraction succeeds the response is always HTTP 200 with some text.

use crate::extraction;
use crate::processing::SummarizeApi;
use crate::ratelimit::SlidingWindowLimiter;
use axum::{
    Json, Router,
    extract::{ConnectInfo, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Upload size cap, with headroom for multipart framing.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please wait before trying again.";
const UNSUPPORTED_TYPE_MESSAGE: &str = "Only PDF files are supported.";

/// Shared state handed to every handler.
pub struct AppState<S> {
    service: Arc<S>,
    limiter: Arc<SlidingWindowLimiter>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            limiter: self.limiter.clone(),
        }
    }
}

/// Build the HTTP router exposing the summarization gateway.
///
/// CORS is wide open (any origin, method, and header); tighten before
/// production deployments.
pub fn create_router<S>(service: Arc<S>, limiter: Arc<SlidingWindowLimiter>) -> Router
where
    S: SummarizeApi + 'static,
{
    Router::new()
        .route("/upload_pdf/", post(upload_pdf::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(AppState { service, limiter })
}

/// Success response for the upload endpoint.
#[derive(Serialize)]
struct SummaryResponse {
    /// Markdown-formatted summary, or an in-band error marker.
    summary: String,
}

/// Error payload used across the gateway's failure responses.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Accept a PDF upload, summarize it, and respond with the summary.
async fn upload_pdf<S>(
    State(state): State<AppState<S>>,
    ConnectInfo(client_addr): ConnectInfo<SocketAddr>,
    mut multipart: Multipart,
) -> Response
where
    S: SummarizeApi,
{
    if !state.limiter.try_acquire(client_addr.ip()) {
        tracing::info!(client = %client_addr.ip(), "Rejected request over rate limit");
        return error_response(StatusCode::TOO_MANY_REQUESTS, RATE_LIMIT_MESSAGE);
    }

    let mut upload: Option<(Option<String>, Vec<u8>)> = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        match field.bytes().await {
            Ok(bytes) => upload = Some((content_type, bytes.to_vec())),
            Err(error) => {
                tracing::warn!(error = %error, "Failed to read upload body");
                return error_response(StatusCode::BAD_REQUEST, "Failed to read file data.");
            }
        }
    }

    let Some((content_type, bytes)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "No file provided.");
    };

    let is_pdf = content_type
        .as_deref()
        .is_some_and(|value| value.eq_ignore_ascii_case("application/pdf"));
    if !is_pdf {
        // Published contract: unsupported types answer 200 with an error body.
        return error_response(StatusCode::OK, UNSUPPORTED_TYPE_MESSAGE);
    }

    let text = match extraction::extract_text(&bytes) {
        Ok(text) => text,
        Err(error) => {
            tracing::warn!(error = %error, "Extraction failed");
            return error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Could not extract text from the uploaded PDF: {error}"),
            );
        }
    };

    let outcome = state.service.summarize_document(text).await;
    if outcome.is_degraded() {
        tracing::warn!(client = %client_addr.ip(), "Returning degraded summary");
    }
    Json(SummaryResponse {
        summary: outcome.into_text(),
    })
    .into_response()
}

/// Return a concise metrics snapshot with summarization counters.
async fn get_metrics<S>(State(state): State<AppState<S>>) -> Response
where
    S: SummarizeApi,
{
    Json(state.service.metrics_snapshot()).into_response()
}
