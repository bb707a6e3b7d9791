//! Banner management.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use mallhub_core::types::{List, Response};
use mallhub_entity::banner::BannerView;
use mallhub_service::banner::{BannerQuery, CreateBannerRequest};

use crate::extractors::{AdminUser, AppJson, AppPath, AppQuery};
use crate::state::AppState;

/// GET /v1/admin/banner
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(query): AppQuery<BannerQuery>,
) -> Json<List<BannerView>> {
    Json(state.banner_service.list(query).await.into())
}

/// POST /v1/admin/banner
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(req): AppJson<CreateBannerRequest>,
) -> Json<Response<BannerView>> {
    Json(state.banner_service.create(req).await.into())
}

/// GET /v1/admin/banner/{id}
pub async fn get(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Json<Response<BannerView>> {
    Json(state.banner_service.get(id).await.into())
}

/// DELETE /v1/admin/banner/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Json<Response<BannerView>> {
    Json(state.banner_service.delete(id).await.into())
}
