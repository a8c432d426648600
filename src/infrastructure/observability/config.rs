//! Observability configuration

use serde::Deserialize;

/// Tracing export and metrics settings
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub tracing: TracingConfig,
    pub metrics: MetricsConfig,
}

/// OpenTelemetry span export, off unless an OTLP collector is available
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub enabled: bool,
    /// gRPC endpoint of the OTLP collector
    pub otlp_endpoint: String,
    pub service_name: String,
    /// Fraction of root spans kept
    pub sampling_ratio: f64,
}

/// Prometheus scrape endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: env!("CARGO_PKG_NAME").to_string(),
            sampling_ratio: 1.0,
        }
    }
}

impl TracingConfig {
    /// Sampling ratio clamped to `0.0..=1.0`; NaN samples nothing
    pub fn effective_sampling_ratio(&self) -> f64 {
        if self.sampling_ratio.is_nan() {
            0.0
        } else {
            self.sampling_ratio.clamp(0.0, 1.0)
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}
