//! Route table

use crate::{
    handlers::health::{handle_component_health, handle_health},
    models::request::ApiResponse,
    AppState,
};
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route("/api/health", get(handle_health))
        .route("/api/health/:name", get(handle_component_health))
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(serde_json::json!({
        "app": state.app_name,
        "version": state.version,
        "endpoints": {
            "health": "/api/health",
            "component": "/api/health/{name}"
        }
    })))
}
