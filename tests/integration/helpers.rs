//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use mallhub_api::{AppState, build_app};
use mallhub_cache::memory::MemoryTtlStore;
use mallhub_core::config::AppConfig;
use mallhub_database::MemoryDatabase;
use mallhub_service::admin::CreateAdminRequest;
use mallhub_service::provider::{LogMailer, LogTelephone};

pub const PASSWORD: &str = "secret123";

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Shared state, for seeding through the services
    pub state: AppState,
    /// Backing store, for asserting on committed rows
    pub db: Arc<MemoryDatabase>,
    /// TTL store holding one-time codes
    pub ttl: Arc<MemoryTtlStore>,
}

/// Decoded response of one request
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// Create a new test application over in-memory stores
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.upload.path = std::env::temp_dir()
            .join(format!("mallhub-it-{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned();

        let db = Arc::new(MemoryDatabase::new());
        let ttl = Arc::new(MemoryTtlStore::default());
        let mailer = Arc::new(LogMailer::new(&config.email));
        let telephone = Arc::new(LogTelephone::new(&config.telephone));

        let state = AppState::new(config, db.clone(), ttl.clone(), mailer, telephone);
        let router = build_app(state.clone());

        Self {
            router,
            state,
            db,
            ttl,
        }
    }

    /// Send one request and decode the JSON body (`Null` when not JSON)
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body = body.map(|b| b.to_string());
        self.raw_request(method, uri, body, token).await
    }

    /// Send one request with a raw JSON body
    pub async fn raw_request(
        &self,
        method: &str,
        uri: &str,
        body: Option<String>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Sign up `username` with an email and return a user token
    pub async fn signup_and_signin(&self, username: &str) -> String {
        let email = format!("{username}@example.com");
        let res = self
            .request(
                "POST",
                "/v1/auth/signup",
                Some(serde_json::json!({
                    "username": username,
                    "password": PASSWORD,
                    "email": email,
                })),
                None,
            )
            .await;
        assert_eq!(res.body["status"], 1, "signup failed: {}", res.body);

        let res = self
            .request(
                "POST",
                "/v1/auth/signin",
                Some(serde_json::json!({ "account": username, "password": PASSWORD })),
                None,
            )
            .await;
        assert_eq!(res.body["status"], 1, "signin failed: {}", res.body);
        res.body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Create an admin through the service and return an admin token
    pub async fn admin_token(&self, username: &str, is_super: bool) -> String {
        self.state
            .admin_service
            .create(CreateAdminRequest {
                username: username.to_string(),
                name: username.to_string(),
                password: PASSWORD.to_string(),
                is_super,
            })
            .await
            .unwrap();

        let res = self
            .request(
                "POST",
                "/v1/admin/signin",
                Some(serde_json::json!({ "username": username, "password": PASSWORD })),
                None,
            )
            .await;
        assert_eq!(res.body["status"], 1, "admin signin failed: {}", res.body);
        res.body["data"]["token"].as_str().unwrap().to_string()
    }
}
