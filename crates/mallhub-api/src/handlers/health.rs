//! Health check handler.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Liveness report.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub cache: bool,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = state.ttl.health_check().await.unwrap_or(false);
    Json(HealthResponse {
        status: if cache { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        cache,
    })
}
