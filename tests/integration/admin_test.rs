//! Integration tests for the back office and the content it publishes.

mod helpers;

use serde_json::json;

use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_only_super_admin_creates_admins() {
    let app = TestApp::new();
    let root = app.admin_token("root", true).await;
    let staff = app.admin_token("staff", false).await;

    let body = json!({ "username": "ops", "name": "Ops", "password": PASSWORD });
    let res = app
        .request("POST", "/v1/admin/create", Some(body.clone()), Some(&staff))
        .await;
    assert_eq!(res.body["status"], 0);

    let res = app
        .request("POST", "/v1/admin/create", Some(body), Some(&root))
        .await;
    assert_eq!(res.body["status"], 1);
    assert_eq!(res.body["data"]["username"], "ops");
    assert!(res.body["data"].get("password_hash").is_none());
    assert_eq!(app.db.snapshot().await.admins.len(), 3);
}

#[tokio::test]
async fn test_banner_published_by_admin_is_public() {
    let app = TestApp::new();
    let admin = app.admin_token("root", true).await;

    let res = app
        .request(
            "POST",
            "/v1/admin/banner",
            Some(json!({
                "image": "https://cdn.example.com/a.png",
                "href": "https://example.com",
                "platform": "app",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(res.body["status"], 1);

    let res = app.request("GET", "/v1/banner?platform=app", None, None).await;
    assert_eq!(res.body["meta"]["total"], 1);
    let res = app.request("GET", "/v1/banner?platform=pc", None, None).await;
    assert_eq!(res.body["meta"]["total"], 0);
}

#[tokio::test]
async fn test_invalid_banner_platform_is_rejected() {
    let app = TestApp::new();
    let admin = app.admin_token("root", true).await;
    let before = app.db.begin_count();

    let res = app
        .request(
            "POST",
            "/v1/admin/banner",
            Some(json!({
                "image": "https://cdn.example.com/a.png",
                "href": "https://example.com",
                "platform": "tv",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(res.body["status"], 0);
    assert_eq!(res.body["message"], "invalid banner platform");
    assert_eq!(app.db.begin_count(), before);
}

#[tokio::test]
async fn test_notification_read_state_per_user() {
    let app = TestApp::new();
    let admin = app.admin_token("root", true).await;
    let alice = app.signup_and_signin("alice").await;
    let bob = app.signup_and_signin("bob").await;

    let res = app
        .request(
            "POST",
            "/v1/admin/notification",
            Some(json!({ "title": "Sale", "content": "Everything half off", "note": "" })),
            Some(&admin),
        )
        .await;
    assert_eq!(res.body["status"], 1, "{}", res.body);
    let id = res.body["data"]["id"].as_str().unwrap().to_string();

    let res = app
        .request("PUT", &format!("/v1/notification/n/{id}/read"), None, Some(&alice))
        .await;
    assert_eq!(res.body["status"], 1);

    let res = app.request("GET", "/v1/notification", None, Some(&alice)).await;
    assert_eq!(res.body["data"][0]["read"], true);
    let res = app.request("GET", "/v1/notification", None, Some(&bob)).await;
    assert_eq!(res.body["data"][0]["read"], false);
    assert_eq!(res.body["data"][0]["read_at"], "");
}

#[tokio::test]
async fn test_message_is_marked_read_when_opened() {
    let app = TestApp::new();
    let admin = app.admin_token("root", true).await;
    let alice = app.signup_and_signin("alice").await;
    let uid = app.db.snapshot().await.users[0].id;

    let res = app
        .request(
            "POST",
            "/v1/admin/message",
            Some(json!({ "uid": uid, "title": "Hello", "content": "Welcome" })),
            Some(&admin),
        )
        .await;
    assert_eq!(res.body["status"], 1, "{}", res.body);
    let id = res.body["data"]["id"].as_str().unwrap().to_string();

    let res = app
        .request("GET", &format!("/v1/message/m/{id}"), None, Some(&alice))
        .await;
    assert_eq!(res.body["status"], 1);
    assert!(app.db.snapshot().await.messages[0].read);
}

#[tokio::test]
async fn test_report_status_update() {
    let app = TestApp::new();
    let admin = app.admin_token("root", true).await;
    let alice = app.signup_and_signin("alice").await;

    let res = app
        .request(
            "POST",
            "/v1/report",
            Some(json!({ "title": "Crash", "content": "App crashes on start", "type": "bug" })),
            Some(&alice),
        )
        .await;
    assert_eq!(res.body["status"], 1, "{}", res.body);
    let id = res.body["data"]["id"].as_str().unwrap().to_string();

    let res = app
        .request(
            "PUT",
            &format!("/v1/admin/report/r/{id}"),
            Some(json!({ "status": "resolved" })),
            Some(&admin),
        )
        .await;
    assert_eq!(res.body["status"], 1, "{}", res.body);

    let res = app
        .request("GET", &format!("/v1/report/r/{id}"), None, Some(&alice))
        .await;
    assert_eq!(res.body["data"]["status"], "resolved");
}
