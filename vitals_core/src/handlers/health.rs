//! Health probe handlers

use crate::{
    error::{AppError, Result},
    models::request::ApiResponse,
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{debug, warn};

/// Answers 200 while every component reports `"ok"` and 503 otherwise. The
/// body carries all entries either way so callers can see what is failing.
pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.health.report();

    let status_code = if report.healthy {
        debug!(target: "http", "GET /api/health - healthy");
        StatusCode::OK
    } else {
        warn!(
            target: "http",
            "GET /api/health - {} unhealthy component(s)",
            report.status.iter().filter(|entry| !entry.is_ok()).count()
        );
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(report))
}

pub async fn handle_component_health(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse> {
    let entry = state
        .health
        .get(&name)
        .ok_or_else(|| AppError::NotFound(format!("Component '{}' not found", name)))?;

    let status_code = if entry.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    Ok((status_code, Json(ApiResponse::success(entry))))
}
