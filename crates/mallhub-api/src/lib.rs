//! # mallhub-api
//!
//! HTTP API layer for MallHub built on Axum.
//!
//! Every JSON endpoint answers HTTP 200 with the response envelope; logical
//! failures, malformed input, and authentication failures all travel in
//! `status` / `message`. Only upload serving and `/health` step outside the
//! envelope.

pub mod app;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server, serve};
pub use state::AppState;
