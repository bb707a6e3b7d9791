//! Integration tests for the caller's address book.

mod helpers;

use serde_json::{Value, json};

use helpers::TestApp;

fn address(name: &str, is_default: Option<bool>) -> Value {
    let mut body = json!({
        "name": name,
        "phone": "13800000000",
        "province_code": "110000",
        "city_code": "110100",
        "area_code": "110101",
        "address": "1 Main Street",
    });
    if let Some(flag) = is_default {
        body["is_default"] = json!(flag);
    }
    body
}

#[tokio::test]
async fn test_first_address_becomes_default() {
    let app = TestApp::new();
    let token = app.signup_and_signin("alice").await;

    let res = app
        .request("POST", "/v1/user/address", Some(address("home", None)), Some(&token))
        .await;
    assert_eq!(res.body["status"], 1);
    assert_eq!(res.body["data"]["is_default"], true);
    assert_eq!(res.body["data"]["created_at"], res.body["data"]["updated_at"]);
}

#[tokio::test]
async fn test_new_default_clears_previous() {
    let app = TestApp::new();
    let token = app.signup_and_signin("bob").await;

    let first = app
        .request("POST", "/v1/user/address", Some(address("home", None)), Some(&token))
        .await;
    let second = app
        .request(
            "POST",
            "/v1/user/address",
            Some(address("office", Some(true))),
            Some(&token),
        )
        .await;
    assert_eq!(second.body["data"]["is_default"], true);

    let first_id = first.body["data"]["id"].as_str().unwrap();
    let res = app
        .request("GET", &format!("/v1/user/address/{first_id}"), None, Some(&token))
        .await;
    assert_eq!(res.body["data"]["is_default"], false);

    let defaults = app
        .db
        .snapshot()
        .await
        .addresses
        .iter()
        .filter(|a| a.is_default)
        .count();
    assert_eq!(defaults, 1);
}

#[tokio::test]
async fn test_list_without_paging_uses_defaults() {
    let app = TestApp::new();
    let token = app.signup_and_signin("carol").await;
    for name in ["a", "b", "c"] {
        app.request("POST", "/v1/user/address", Some(address(name, None)), Some(&token))
            .await;
    }

    let res = app.request("GET", "/v1/user/address", None, Some(&token)).await;
    assert_eq!(res.body["status"], 1);
    assert_eq!(res.body["meta"]["page"], 0);
    assert_eq!(res.body["meta"]["limit"], 10);
    assert_eq!(res.body["meta"]["num"], 3);
    assert_eq!(res.body["meta"]["total"], 3);

    let res = app
        .request("GET", "/v1/user/address?page=1&limit=2", None, Some(&token))
        .await;
    assert_eq!(res.body["meta"]["num"], 1);
}

#[tokio::test]
async fn test_huge_page_is_empty() {
    let app = TestApp::new();
    let token = app.signup_and_signin("gina").await;
    app.request("POST", "/v1/user/address", Some(address("home", None)), Some(&token))
        .await;

    let res = app
        .request(
            "GET",
            "/v1/user/address?page=9223372036854775807&limit=100",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(res.body["status"], 1);
    assert_eq!(res.body["meta"]["num"], 0);
    assert_eq!(res.body["meta"]["total"], 1);
}

#[tokio::test]
async fn test_addresses_are_scoped_to_owner() {
    let app = TestApp::new();
    let owner = app.signup_and_signin("dave").await;
    let other = app.signup_and_signin("erin").await;

    let created = app
        .request("POST", "/v1/user/address", Some(address("home", None)), Some(&owner))
        .await;
    let id = created.body["data"]["id"].as_str().unwrap();

    let res = app
        .request("GET", &format!("/v1/user/address/{id}"), None, Some(&other))
        .await;
    assert_eq!(res.body["status"], 0);

    let res = app
        .request("DELETE", &format!("/v1/user/address/{id}"), None, Some(&other))
        .await;
    assert_eq!(res.body["status"], 0);
    assert_eq!(app.db.snapshot().await.addresses.len(), 1);
}

#[tokio::test]
async fn test_missing_fields_open_no_transaction() {
    let app = TestApp::new();
    let token = app.signup_and_signin("frank").await;
    let before = app.db.begin_count();

    let res = app
        .request(
            "POST",
            "/v1/user/address",
            Some(json!({ "name": "home" })),
            Some(&token),
        )
        .await;
    assert_eq!(res.body["status"], 0);
    assert_eq!(app.db.begin_count(), before);
}

#[tokio::test]
async fn test_malformed_id_is_invalid_params() {
    let app = TestApp::new();
    let token = app.signup_and_signin("gina").await;

    let res = app
        .request("GET", "/v1/user/address/not-a-uuid", None, Some(&token))
        .await;
    assert_eq!(res.body["status"], 0);
    assert_eq!(res.body["message"], "invalid params");
}
