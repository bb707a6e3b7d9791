//! Notification management.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use mallhub_core::types::{List, Query, Response};
use mallhub_entity::notification::NotificationAdminView;
use mallhub_service::notification::CreateNotificationRequest;

use crate::extractors::{AdminUser, AppJson, AppPath, AppQuery};
use crate::state::AppState;

/// GET /v1/admin/notification
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(query): AppQuery<Query>,
) -> Json<List<NotificationAdminView>> {
    Json(state.notification_service.list(query).await.into())
}

/// POST /v1/admin/notification
pub async fn create(
    State(state): State<AppState>,
    admin: AdminUser,
    AppJson(req): AppJson<CreateNotificationRequest>,
) -> Json<Response<NotificationAdminView>> {
    Json(state.notification_service.create(&admin, req).await.into())
}

/// GET /v1/admin/notification/n/{id}
pub async fn get(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Json<Response<NotificationAdminView>> {
    Json(state.notification_service.get(id).await.into())
}

/// DELETE /v1/admin/notification/n/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Json<Response<NotificationAdminView>> {
    Json(state.notification_service.delete(id).await.into())
}
