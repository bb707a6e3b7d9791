//! Admin sign-in, profile, and admin creation.

use axum::Json;
use axum::extract::State;

use mallhub_core::types::Response;
use mallhub_entity::admin::AdminView;
use mallhub_service::admin::{AdminSigninRequest, AdminSigninView, CreateAdminRequest};

use crate::extractors::{AdminUser, AppJson};
use crate::state::AppState;

/// POST /v1/admin/signin
pub async fn signin(
    State(state): State<AppState>,
    AppJson(req): AppJson<AdminSigninRequest>,
) -> Json<Response<AdminSigninView>> {
    Json(state.admin_service.signin(req).await.into())
}

/// GET /v1/admin/profile
pub async fn profile(State(state): State<AppState>, admin: AdminUser) -> Json<Response<AdminView>> {
    Json(state.admin_service.profile(&admin).await.into())
}

/// POST /v1/admin/create
pub async fn create(
    State(state): State<AppState>,
    admin: AdminUser,
    AppJson(req): AppJson<CreateAdminRequest>,
) -> Json<Response<AdminView>> {
    Json(state.admin_service.create_by(&admin, req).await.into())
}
