//! Service, liveness and readiness endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;
use crate::domain::{RegistryHealth, RegistryStatus};

use super::state::AppState;

#[derive(Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness summary without the per-slot detail
#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: RegistryStatus,
    pub loaded_count: usize,
    pub total_count: usize,
}

/// GET /
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Cancer Classification API",
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health - per-slot registry health.
///
/// A partial registry still serves every slot (fallbacks abstain or predict
/// in place of missing artifacts), so this is always 200.
pub async fn health_check(State(state): State<AppState>) -> Json<RegistryHealth> {
    Json(state.classifier.health())
}

/// GET /ready
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let health = state.classifier.health();

    let response = ReadyResponse {
        status: health.status,
        loaded_count: health.loaded_count,
        total_count: health.total_count,
    };

    (StatusCode::OK, Json(response))
}

/// GET /live
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}
