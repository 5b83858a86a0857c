//! Metrics exporter settings

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics: MetricsConfig,
}

/// Prometheus exporter; disabled means no recorder and no scrape route
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Scrape route, outside `/v1` so it cannot shadow the model metrics endpoint
    pub path: String,
    /// Histogram buckets for `batch_duration_seconds`
    pub batch_duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
            batch_duration_buckets: vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0, 120.0],
        }
    }
}
