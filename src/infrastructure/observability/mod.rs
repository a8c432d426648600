//! Observability infrastructure - Tracing and Metrics

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{
    create_metrics_router, init_metrics, record_embedding_attempt, record_http_request,
    record_ingestion, record_search, record_vector_store_failure, record_vector_store_request,
    PrometheusMetrics,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
