//! Prediction endpoint handlers

use axum::extract::{Multipart, State};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, BatchPredictRequest, Json, PredictRequest};
use crate::domain::{BatchRow, DatasetPrediction};
use crate::infrastructure::services::BatchReport;

use super::upload::read_csv_upload;

/// POST /v1/predict
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<DatasetPrediction>, ApiError> {
    debug!(dataset = %request.dataset, features = request.features.len(), "Predict request");

    let prediction = state
        .classifier
        .predict(&request.dataset, &request.features)?;

    Ok(Json(prediction))
}

/// POST /v1/predict/batch
pub async fn predict_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchPredictRequest>,
) -> Result<Json<BatchReport>, ApiError> {
    debug!(dataset = %request.dataset, rows = request.rows.len(), "Batch predict request");

    let rows: Vec<BatchRow> = request.rows.into_iter().map(BatchRow::from).collect();
    let report = state.classifier.predict_batch(&request.dataset, rows).await?;

    Ok(Json(report))
}

/// POST /v1/predict/batch/csv - multipart `dataset` + `file`
pub async fn predict_batch_csv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchReport>, ApiError> {
    let upload = read_csv_upload(multipart).await?;
    let dataset = upload
        .dataset
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing form field 'dataset'").with_param("dataset"))?;

    debug!(
        dataset = %dataset,
        filename = %upload.filename,
        bytes = upload.content.len(),
        "CSV batch predict request"
    );

    let report = state.classifier.predict_csv(&dataset, upload.content).await?;

    Ok(Json(report))
}
