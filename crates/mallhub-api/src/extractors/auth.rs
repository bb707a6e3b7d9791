//! Bearer-token extractors.
//!
//! [`AuthUser`] accepts only user tokens and [`AdminUser`] only admin
//! tokens. A missing, invalid, or wrong-role token is rejected with a failed
//! envelope.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use mallhub_auth::Role;
use mallhub_core::error::AppError;
use mallhub_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated end user.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

/// Authenticated admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::Deref for AdminUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("please sign in first"))
}

fn authenticate(parts: &Parts, state: &AppState, role: Role) -> Result<RequestContext, AppError> {
    let token = bearer_token(parts)?;
    let claims = state.jwt_decoder.decode_for(token, role)?;
    Ok(match role {
        Role::User => RequestContext::user(claims.sub),
        Role::Admin => RequestContext::admin(claims.sub),
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(authenticate(parts, state, Role::User)?))
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(authenticate(parts, state, Role::Admin)?))
    }
}
