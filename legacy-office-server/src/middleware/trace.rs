//! Per-request trace id, span and latency logging.
//!
//! Bodies are not buffered: uploads and converted files are binary and can
//! be large, so only their declared length is logged.

use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

pub static X_TRACE_ID: &str = "x-trace-id";

pub async fn trace_middleware(mut req: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();

    // Reuse the caller's trace id when it is a valid UUID.
    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    let trace_header = HeaderValue::from_str(&trace_id.to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("invalid"));

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %method,
        path = %path,
    );

    async move {
        info!(
            content_type = content_type(req.headers()),
            content_length = content_length(req.headers()),
            "→ request started"
        );
        req.headers_mut().insert(X_TRACE_ID, trace_header.clone());

        let mut response = next.run(req).await;
        response.headers_mut().insert(X_TRACE_ID, trace_header);

        info!(
            status = response.status().as_u16(),
            content_length = content_length(response.headers()),
            latency_ms = start_time.elapsed().as_millis(),
            "← response finished"
        );

        response
    }
    .instrument(span)
    .await
}

fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

fn content_length(headers: &HeaderMap) -> u64 {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
