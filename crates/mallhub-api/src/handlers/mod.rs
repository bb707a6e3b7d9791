//! Route handlers organized by domain.
//!
//! Handlers never fail at the transport level: each one turns its
//! operation's result into an envelope.

pub mod address;
pub mod admin;
pub mod auth;
pub mod banner;
pub mod health;
pub mod message;
pub mod notification;
pub mod report;
pub mod upload;
pub mod user;
