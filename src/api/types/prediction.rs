//! Request and response bodies for the classification endpoints

use serde::{Deserialize, Serialize};

use crate::domain::registry::{DatasetSummary, MetricsRecord};
use crate::domain::{BatchRow, CompatibilityReport, FeatureSample};

/// `POST /v1/predict`
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub dataset: String,
    pub features: FeatureSample,
}

/// One row of a JSON batch; `dataset` overrides the batch default
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRowRequest {
    #[serde(default)]
    pub dataset: Option<String>,
    pub features: FeatureSample,
}

impl From<BatchRowRequest> for BatchRow {
    fn from(row: BatchRowRequest) -> Self {
        match row.dataset {
            Some(dataset) => BatchRow::for_dataset(dataset, row.features),
            None => BatchRow::sample(row.features),
        }
    }
}

/// `POST /v1/predict/batch`
#[derive(Debug, Clone, Deserialize)]
pub struct BatchPredictRequest {
    pub dataset: String,
    pub rows: Vec<BatchRowRequest>,
}

/// `POST /v1/analyze`
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub columns: Vec<String>,
    #[serde(default)]
    pub row_count: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsQuery {
    pub dataset: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    pub metrics: Vec<MetricsRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetsResponse {
    pub datasets: Vec<DatasetSummary>,
}

/// Compatibility report for an uploaded file
#[derive(Debug, Clone, Serialize)]
pub struct CsvAnalysisResponse {
    pub filename: String,
    #[serde(flatten)]
    pub report: CompatibilityReport,
}
