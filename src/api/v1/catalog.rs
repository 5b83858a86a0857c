//! Dataset catalog and stored model metrics

use axum::extract::{Query, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, DatasetsResponse, Json, MetricsQuery, MetricsResponse};

/// GET /v1/datasets
pub async fn list_datasets(State(state): State<AppState>) -> Json<DatasetsResponse> {
    Json(DatasetsResponse {
        datasets: state.classifier.datasets(),
    })
}

/// GET /v1/metrics?dataset=
pub async fn list_metrics(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let metrics = state.classifier.metrics(query.dataset.as_deref())?;

    Ok(Json(MetricsResponse { metrics }))
}
