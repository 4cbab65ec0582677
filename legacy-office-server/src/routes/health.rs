//! Status and health endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::formats::supported_extensions;
use crate::schemas::{HealthResponse, StatusResponse};
use crate::state::AppState;

pub const SERVICE_NAME: &str = "Legacy Office Converter";

#[derive(OpenApi)]
#[openapi(
    paths(get_status, get_health),
    components(schemas(StatusResponse, HealthResponse)),
)]
pub struct HealthApi;

/// Register status and health-check routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_status))
        .route("/health", get(get_health))
}

/// Service status.
///
/// Always 200; `status` reflects whether the converter binary responds.
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service status", body = StatusResponse)
    )
)]
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let healthy = state.converter.probe().await.is_available();
    Json(StatusResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_owned(),
        service: SERVICE_NAME.to_owned(),
        supported_formats: supported_extensions().into_iter().map(str::to_owned).collect(),
    })
}

/// Health check for monitoring and container orchestration.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Converter binary responds", body = HealthResponse),
        (status = 503, description = "Converter binary not responding"),
    )
)]
pub async fn get_health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, ServerError> {
    if !state.converter.probe().await.is_available() {
        return Err(ServerError::Unavailable);
    }
    Ok(Json(HealthResponse {
        status: "healthy".to_owned(),
    }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
