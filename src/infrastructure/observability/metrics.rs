//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;
use crate::domain::{BatchEntry, DatasetPrediction, RegistryHealth};

const MAX_PATH_LABEL: usize = 50;

/// Recorder handle plus the route it is scraped on
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Install the global Prometheus recorder.
///
/// Returns `None` when disabled or when a recorder is already installed;
/// the service keeps running without metrics in both cases.
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("batch_duration_seconds".to_string()),
            &config.batch_duration_buckets,
        )
        .and_then(|builder| builder.install_recorder());

    match handle {
        Ok(handle) => {
            gauge!("cancer_classifier_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!(path = %config.path, "Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize Prometheus metrics");
            None
        }
    }
}

/// Stateless router serving the scrape endpoint
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    Router::new()
        .route(&metrics.path.clone(), get(render_metrics))
        .with_state(metrics)
}

async fn render_metrics(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Count and time one HTTP request by route pattern and status
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record one classified sample and any slot abstentions
pub fn record_prediction(prediction: &DatasetPrediction) {
    let consensus = if prediction.consensus.prediction == 1 {
        "malignant"
    } else {
        "benign"
    };

    counter!(
        "predictions_total",
        "dataset" => prediction.dataset.clone(),
        "consensus" => consensus
    )
    .increment(1);

    for slot in prediction.predictions.iter().filter(|p| p.is_abstained()) {
        counter!(
            "slot_abstentions_total",
            "dataset" => prediction.dataset.clone(),
            "slot" => slot.slot.clone()
        )
        .increment(1);
    }
}

/// Record batch row outcomes
pub fn record_batch(dataset: &str, entries: &[BatchEntry], duration: Duration) {
    let succeeded = entries.iter().filter(|e| e.is_success()).count() as u64;
    let failed = entries.len() as u64 - succeeded;

    counter!("batch_rows_total", "dataset" => dataset.to_string(), "status" => "success")
        .increment(succeeded);
    counter!("batch_rows_total", "dataset" => dataset.to_string(), "status" => "error")
        .increment(failed);
    histogram!("batch_duration_seconds", "dataset" => dataset.to_string())
        .record(duration.as_secs_f64());

    for prediction in entries.iter().filter_map(|e| e.outcome.as_ref().ok()) {
        record_prediction(prediction);
    }
}

/// Publish how many slots of each dataset came from artifacts vs fallbacks
pub fn record_registry_health(health: &RegistryHealth) {
    let mut datasets: Vec<&str> = health.slots.iter().map(|s| s.dataset.as_str()).collect();
    datasets.dedup();

    for dataset in datasets {
        let (loaded, fallback) = health
            .slots
            .iter()
            .filter(|s| s.dataset == dataset)
            .fold((0u32, 0u32), |(l, f), s| if s.loaded { (l + 1, f) } else { (l, f + 1) });

        gauge!("registry_slots", "dataset" => dataset.to_string(), "origin" => "artifact")
            .set(f64::from(loaded));
        gauge!("registry_slots", "dataset" => dataset.to_string(), "origin" => "fallback")
            .set(f64::from(fallback));
    }
}

/// Collapse numeric segments and cap length so unmatched paths cannot
/// explode label cardinality
fn sanitize_path(path: &str) -> String {
    let mut path = regex::Regex::new(r"/\d+(/|$)")
        .map(|re| re.replace_all(path, "/{id}$1").into_owned())
        .unwrap_or_else(|_| path.to_string());

    if let Some((cut, _)) = path.char_indices().nth(MAX_PATH_LABEL) {
        path.truncate(cut);
    }
    path
}
