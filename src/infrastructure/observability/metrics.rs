//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;
use crate::domain::StoreOperation;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
///
/// Without an installed recorder every `record_*` call below is a no-op,
/// which is what the CLI commands and the tests rely on.
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("docsearch_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

fn status_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record one embedding call attempt
pub fn record_embedding_attempt(success: bool) {
    counter!("embedding_attempts_total", "status" => status_label(success)).increment(1);
}

/// Record one vector store attempt
pub fn record_vector_store_request(backend: &'static str, operation: StoreOperation, success: bool) {
    counter!(
        "vector_store_requests_total",
        "backend" => backend,
        "operation" => operation.to_string(),
        "status" => status_label(success)
    )
    .increment(1);
}

/// Record a vector store operation that exhausted its retries
pub fn record_vector_store_failure(backend: &'static str, operation: StoreOperation) {
    counter!(
        "vector_store_failures_total",
        "backend" => backend,
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Record a finished ingestion
pub fn record_ingestion(format: &str, outcome: &'static str, chunks: usize, duration: Duration) {
    let labels = [("format", format.to_string()), ("outcome", outcome.to_string())];

    counter!("ingestion_requests_total", &labels).increment(1);
    histogram!("ingestion_duration_seconds", &labels).record(duration.as_secs_f64());

    if chunks > 0 {
        counter!("ingestion_chunks_total", "format" => format.to_string()).increment(chunks as u64);
    }
}

/// Record a finished search
pub fn record_search(success: bool, results: usize, duration: Duration) {
    let status = status_label(success);

    counter!("search_requests_total", "status" => status).increment(1);
    histogram!("search_duration_seconds", "status" => status).record(duration.as_secs_f64());

    if success {
        histogram!("search_results").record(results as f64);
    }
}

/// Collapse UUID and numeric path segments to keep label cardinality bounded
fn sanitize_path(path: &str) -> String {
    let sanitized: Vec<&str> = path
        .split('/')
        .map(|segment| {
            let is_numeric = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());

            if is_numeric || uuid::Uuid::parse_str(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect();

    let mut path = sanitized.join("/");

    if path.len() > 50 {
        let mut cut = 50;
        while !path.is_char_boundary(cut) {
            cut -= 1;
        }
        path.truncate(cut);
    }

    path
}
