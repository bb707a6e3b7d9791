//! Route definitions for the MallHub HTTP API.
//!
//! User-facing routes are mounted under `/v1`, back-office routes under
//! `/v1/admin`. The router receives `AppState` and passes it to all
//! handlers via Axum's `State` extractor.

use axum::Router;
use axum::routing::{get, post, put};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let v1 = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(banner_routes())
        .merge(message_routes())
        .merge(notification_routes())
        .merge(report_routes())
        .merge(upload_routes())
        .nest("/admin", admin_routes());

    Router::new()
        .nest("/v1", v1)
        .route("/health", get(handlers::health::health))
        .with_state(state)
}

/// Sign-up, sign-in, and password reset.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/signin", post(handlers::auth::signin))
        .route("/auth/password/reset", post(handlers::auth::reset_password))
        .route(
            "/email/send/password/reset",
            post(handlers::auth::send_reset_email),
        )
        .route(
            "/phone/send/password/reset",
            post(handlers::auth::send_reset_sms),
        )
}

/// Profile, password, and addresses of the caller.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/profile", get(handlers::user::profile))
        .route("/user/password", put(handlers::user::change_password))
        .route(
            "/user/address",
            get(handlers::address::list).post(handlers::address::create),
        )
        .route(
            "/user/address/{id}",
            get(handlers::address::get)
                .put(handlers::address::update)
                .delete(handlers::address::delete),
        )
}

fn banner_routes() -> Router<AppState> {
    Router::new()
        .route("/banner", get(handlers::banner::list))
        .route("/banner/{id}", get(handlers::banner::get))
}

fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/message", get(handlers::message::list))
        .route("/message/m/{id}", get(handlers::message::get))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notification", get(handlers::notification::list))
        .route("/notification/n/{id}", get(handlers::notification::get))
        .route(
            "/notification/n/{id}/read",
            put(handlers::notification::mark_read),
        )
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/report",
            get(handlers::report::list).post(handlers::report::create),
        )
        .route("/report/r/{id}", get(handlers::report::get))
}

/// Uploads and serving of stored uploads.
fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload/image", post(handlers::upload::upload_image))
        .route("/upload/file", post(handlers::upload::upload_file))
        .route("/resource/image/{filename}", get(handlers::upload::image))
        .route("/resource/file/{filename}", get(handlers::upload::file))
}

/// Back office.
fn admin_routes() -> Router<AppState> {
    use handlers::admin;

    Router::new()
        .route("/signin", post(admin::account::signin))
        .route("/profile", get(admin::account::profile))
        .route("/create", post(admin::account::create))
        .route(
            "/banner",
            get(admin::banner::list).post(admin::banner::create),
        )
        .route(
            "/banner/{id}",
            get(admin::banner::get).delete(admin::banner::delete),
        )
        .route(
            "/message",
            get(admin::message::list).post(admin::message::create),
        )
        .route(
            "/message/m/{id}",
            get(admin::message::get).delete(admin::message::delete),
        )
        .route(
            "/notification",
            get(admin::notification::list).post(admin::notification::create),
        )
        .route(
            "/notification/n/{id}",
            get(admin::notification::get).delete(admin::notification::delete),
        )
        .route("/report", get(admin::report::list))
        .route(
            "/report/r/{id}",
            get(admin::report::get).put(admin::report::update_status),
        )
}
