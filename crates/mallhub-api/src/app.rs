//! Application builder: wires router, middleware, and state into an Axum
//! app and serves it.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use mallhub_cache::CacheManager;
use mallhub_core::config::AppConfig;
use mallhub_core::error::{AppError, ErrorKind};
use mallhub_core::result::AppResult;
use mallhub_core::traits::TtlStore;
use mallhub_database::DatabasePool;
use mallhub_service::provider::{build_mailer, build_telephone};

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(build_compression_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(request_logging))
}

/// Wires the configured TTL store and providers over `pool` and serves.
pub async fn run_server(config: AppConfig, pool: DatabasePool) -> AppResult<()> {
    info!(provider = %config.cache.provider, "Initializing TTL store");
    let ttl: Arc<dyn TtlStore> = Arc::new(CacheManager::new(&config.cache).await?);

    let mailer = build_mailer(&config.email)?;
    let telephone = build_telephone(&config.telephone)?;

    let state = AppState::new(config, Arc::new(pool.database()), ttl, mailer, telephone);
    let result = serve(state).await;

    pool.close().await;
    result
}

/// Binds the configured address and serves until Ctrl+C.
pub async fn serve(state: AppState) -> AppResult<()> {
    let addr = state.config.server.bind_address();
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, format!("Failed to bind {addr}"), e)
    })?;
    info!(address = %addr, "MallHub server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::unknown(format!("Server error: {e}")))?;

    info!("MallHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
