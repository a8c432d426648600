//! Access logging keyed by request id

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::{info, warn};

use super::matched_path;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Log one line per request with its status and latency
///
/// `TraceLayer` owns the request span, so this only emits events.
pub async fn access_log_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = matched_path(&request);
    let request_id = request_id(&request);

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), duration_ms, %request_id, "Request failed");
    } else {
        info!(%method, %path, status = status.as_u16(), duration_ms, %request_id, "Request completed");
    }

    response
}

fn request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}
