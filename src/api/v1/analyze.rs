//! Dataset compatibility endpoint handlers

use axum::extract::{Multipart, State};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{AnalyzeRequest, ApiError, CsvAnalysisResponse, Json};
use crate::domain::CompatibilityReport;

use super::upload::read_csv_upload;

/// POST /v1/analyze
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<CompatibilityReport> {
    Json(state.classifier.analyze(&request.columns, request.row_count))
}

/// POST /v1/analyze/csv
pub async fn analyze_csv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CsvAnalysisResponse>, ApiError> {
    let upload = read_csv_upload(multipart).await?;
    debug!(filename = %upload.filename, bytes = upload.content.len(), "Analyzing CSV upload");

    let report = state.classifier.analyze_csv(upload.content).await?;

    Ok(Json(CsvAnalysisResponse {
        filename: upload.filename,
        report,
    }))
}
