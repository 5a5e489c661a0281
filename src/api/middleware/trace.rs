use super::request_id::REQUEST_ID;
use axum::http::{Request, Response};
use std::time::Duration;
use tracing::{Span, field};

/// Opens the per-request span, keyed by the id `request_id_middleware` assigned.
pub fn request_span<B>(request: &Request<B>) -> Span {
    let request_id = request
        .headers()
        .get(&REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        status = field::Empty,
    )
}

pub fn record_response<B>(response: &Response<B>, latency: Duration, span: &Span) {
    let status = response.status();
    span.record("status", status.as_u16());

    let elapsed_ms = latency.as_millis() as u64;
    if status.is_server_error() {
        tracing::warn!(elapsed_ms, "📤 request failed");
    } else {
        tracing::info!(elapsed_ms, "📤 request completed");
    }
}

