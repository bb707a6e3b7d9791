//! Public banner handlers.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use mallhub_core::types::{List, Response};
use mallhub_entity::banner::BannerView;
use mallhub_service::banner::BannerQuery;

use crate::extractors::{AppPath, AppQuery};
use crate::state::AppState;

/// GET /v1/banner
pub async fn list(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<BannerQuery>,
) -> Json<List<BannerView>> {
    Json(state.banner_service.list(query).await.into())
}

/// GET /v1/banner/{id}
pub async fn get(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Json<Response<BannerView>> {
    Json(state.banner_service.get(id).await.into())
}
