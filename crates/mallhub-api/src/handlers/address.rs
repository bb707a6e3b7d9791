//! Address handlers.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use mallhub_core::types::{List, Query, Response};
use mallhub_entity::address::AddressView;
use mallhub_service::address::{CreateAddressRequest, UpdateAddressRequest};

use crate::extractors::{AppJson, AppPath, AppQuery, AuthUser};
use crate::state::AppState;

/// GET /v1/user/address
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(query): AppQuery<Query>,
) -> Json<List<AddressView>> {
    Json(state.address_service.list(&auth, query).await.into())
}

/// POST /v1/user/address
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<CreateAddressRequest>,
) -> Json<Response<AddressView>> {
    Json(state.address_service.create(&auth, req).await.into())
}

/// GET /v1/user/address/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Json<Response<AddressView>> {
    Json(state.address_service.get(&auth, id).await.into())
}

/// PUT /v1/user/address/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateAddressRequest>,
) -> Json<Response<AddressView>> {
    Json(state.address_service.update(&auth, id, req).await.into())
}

/// DELETE /v1/user/address/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Json<Response<AddressView>> {
    Json(state.address_service.delete(&auth, id).await.into())
}
