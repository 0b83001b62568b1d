//! Health check endpoints

use axum::{extract::State, Json};

use crate::{models::HealthResponse, state::AppState};

/// Landing message
pub async fn root() -> &'static str {
    "CivicOps API is running. POST /api/dev/token, then GET /api/me"
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.uptime_seconds(),
        work_items: state.work_items.count(),
    })
}
