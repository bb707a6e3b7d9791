//! # mallhub-entity
//!
//! Table row models for MallHub. Every row struct derives `sqlx::FromRow`;
//! each module also carries the insert payload for its table and the
//! projections handed to callers (a user-facing view and, where the two
//! differ, an admin-facing view). Projections format timestamps for the wire.

pub mod address;
pub mod admin;
pub mod banner;
pub mod message;
pub mod notification;
pub mod report;
pub mod user;
