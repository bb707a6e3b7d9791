//! User self-service handlers.

use axum::Json;
use axum::extract::State;

use mallhub_core::types::Response;
use mallhub_entity::user::UserView;
use mallhub_service::user::ChangePasswordRequest;

use crate::extractors::{AppJson, AuthUser};
use crate::state::AppState;

/// GET /v1/user/profile
pub async fn profile(State(state): State<AppState>, auth: AuthUser) -> Json<Response<UserView>> {
    Json(state.user_service.profile(&auth).await.into())
}

/// PUT /v1/user/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> Json<Response<bool>> {
    Json(state.user_service.change_password(&auth, req).await.into())
}
