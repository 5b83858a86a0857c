//! Versioned classification endpoints

pub mod analyze;
pub mod catalog;
pub mod predict;
pub mod upload;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/datasets", get(catalog::list_datasets))
        .route("/metrics", get(catalog::list_metrics))
        .route("/predict", post(predict::predict))
        .route("/predict/batch", post(predict::predict_batch))
        .route("/predict/batch/csv", post(predict::predict_batch_csv))
        .route("/analyze", post(analyze::analyze))
        .route("/analyze/csv", post(analyze::analyze_csv))
}
