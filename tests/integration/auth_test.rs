//! Integration tests for sign-up, sign-in, and the envelope contract.

mod helpers;

use axum::http::StatusCode;

use mallhub_cache::keys;
use mallhub_core::traits::TtlStore;

use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_signup_then_signin() {
    let app = TestApp::new();
    let token = app.signup_and_signin("alice").await;

    let res = app.request("GET", "/v1/user/profile", None, Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], 1);
    assert_eq!(res.body["message"], "");
    assert_eq!(res.body["data"]["username"], "alice");
    assert_eq!(app.db.snapshot().await.users.len(), 1);
}

#[tokio::test]
async fn test_signin_by_email() {
    let app = TestApp::new();
    app.signup_and_signin("bob").await;

    let res = app
        .request(
            "POST",
            "/v1/auth/signin",
            Some(serde_json::json!({ "account": "bob@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(res.body["status"], 1);
    assert!(res.body["data"]["token"].as_str().is_some());
}

#[tokio::test]
async fn test_wrong_password_fails_inside_envelope() {
    let app = TestApp::new();
    app.signup_and_signin("carol").await;

    let res = app
        .request(
            "POST",
            "/v1/auth/signin",
            Some(serde_json::json!({ "account": "carol", "password": "not-it" })),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], 0);
    assert!(res.body["data"].is_null());
    assert!(!res.body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let app = TestApp::new();
    app.signup_and_signin("dave").await;

    let res = app
        .request(
            "POST",
            "/v1/auth/signup",
            Some(serde_json::json!({ "username": "dave", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(res.body["status"], 0);
    assert_eq!(app.db.snapshot().await.users.len(), 1);
}

#[tokio::test]
async fn test_malformed_json_is_invalid_params() {
    let app = TestApp::new();

    let res = app
        .raw_request("POST", "/v1/auth/signin", Some("{not json".to_string()), None)
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], 0);
    assert_eq!(res.body["message"], "invalid params");
    assert_eq!(app.db.begin_count(), 0);
}

#[tokio::test]
async fn test_missing_token_is_rejected_inside_envelope() {
    let app = TestApp::new();

    let res = app.request("GET", "/v1/user/profile", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], 0);
    assert_eq!(res.body["message"], "please sign in first");
}

#[tokio::test]
async fn test_user_token_cannot_reach_admin_routes() {
    let app = TestApp::new();
    let token = app.signup_and_signin("erin").await;

    let res = app.request("GET", "/v1/admin/profile", None, Some(&token)).await;
    assert_eq!(res.body["status"], 0);
}

#[tokio::test]
async fn test_reset_email_for_unknown_account_returns_false() {
    let app = TestApp::new();

    let res = app
        .request(
            "POST",
            "/v1/email/send/password/reset",
            Some(serde_json::json!({ "to": "ghost@example.com" })),
            None,
        )
        .await;
    assert_eq!(res.body["status"], 0);
    assert_eq!(res.body["data"], false);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let res = app.request("GET", "/health", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["cache"], true);
}

#[tokio::test]
async fn test_reset_email_flow_stores_code() {
    let app = TestApp::new();
    app.signup_and_signin("frank").await;

    let res = app
        .request(
            "POST",
            "/v1/email/send/password/reset",
            Some(serde_json::json!({ "to": "frank@example.com" })),
            None,
        )
        .await;
    assert_eq!(res.body["status"], 1);
    assert_eq!(res.body["data"], true);
}

#[tokio::test]
async fn test_sms_reset_is_redeemed_with_its_phone() {
    let app = TestApp::new();
    let phone = "13800000042";
    let res = app
        .request(
            "POST",
            "/v1/auth/signup",
            Some(serde_json::json!({
                "username": "gwen",
                "password": PASSWORD,
                "phone": phone,
            })),
            None,
        )
        .await;
    assert_eq!(res.body["status"], 1);

    let res = app
        .request(
            "POST",
            "/v1/phone/send/password/reset",
            Some(serde_json::json!({ "phone": phone })),
            None,
        )
        .await;
    assert_eq!(res.body["status"], 1);

    let raw = app
        .ttl
        .get(&keys::sms_reset_code(phone))
        .await
        .unwrap()
        .unwrap();
    let code = raw.rsplit(':').next().unwrap().to_string();

    // A bare six-digit code is never looked up as an SMS code.
    let res = app
        .request(
            "POST",
            "/v1/auth/password/reset",
            Some(serde_json::json!({ "code": code, "new_password": "attacker1" })),
            None,
        )
        .await;
    assert_eq!(res.body["status"], 0);
    assert_eq!(res.body["message"], "invalid reset code");

    let res = app
        .request(
            "POST",
            "/v1/auth/password/reset",
            Some(serde_json::json!({
                "code": code,
                "phone": phone,
                "new_password": "brand-new1",
            })),
            None,
        )
        .await;
    assert_eq!(res.body["status"], 1, "{}", res.body);

    let res = app
        .request(
            "POST",
            "/v1/auth/signin",
            Some(serde_json::json!({ "account": phone, "password": "brand-new1" })),
            None,
        )
        .await;
    assert_eq!(res.body["status"], 1);
}
