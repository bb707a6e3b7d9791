//! Request context carrying the authenticated actor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mallhub_auth::Role;

/// Context for the current authenticated request.
///
/// Built by the auth extractor and passed into service methods so that
/// every operation knows *who* is acting. Immutable for the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's or admin's ID.
    pub actor_id: Uuid,
    /// Which side of the API the token was issued for.
    pub role: Role,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Context for an end user.
    pub fn user(actor_id: Uuid) -> Self {
        Self {
            actor_id,
            role: Role::User,
            request_time: Utc::now(),
        }
    }

    /// Context for an admin.
    pub fn admin(actor_id: Uuid) -> Self {
        Self {
            actor_id,
            role: Role::Admin,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the actor is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}
