//! Notification handlers with per-user read state.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use mallhub_core::types::{List, Query, Response};
use mallhub_entity::notification::NotificationView;

use crate::extractors::{AppPath, AppQuery, AuthUser};
use crate::state::AppState;

/// GET /v1/notification
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(query): AppQuery<Query>,
) -> Json<List<NotificationView>> {
    Json(state.notification_service.list_for_user(&auth, query).await.into())
}

/// GET /v1/notification/n/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Json<Response<NotificationView>> {
    Json(state.notification_service.get_for_user(&auth, id).await.into())
}

/// PUT /v1/notification/n/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Json<Response<bool>> {
    Json(state.notification_service.mark_read(&auth, id).await.into())
}
