//! Integration tests for uploads and serving stored uploads.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use helpers::TestApp;

const BOUNDARY: &str = "mallhub-test-boundary";

fn multipart_body(field: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(app: &TestApp, uri: &str, token: &str, body: Vec<u8>) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_upload_then_fetch_image() {
    let app = TestApp::new();
    let token = app.signup_and_signin("alice").await;

    let res = upload(
        &app,
        "/v1/upload/image",
        &token,
        multipart_body("file", "avatar.png", b"\x89PNG fake image"),
    )
    .await;
    assert_eq!(res["status"], 1, "{res}");
    assert_eq!(res["data"]["origin"], "avatar.png");
    let url = res["data"]["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/v1/resource/image/"));

    let request = Request::builder().uri(&url).body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"\x89PNG fake image");
}

#[tokio::test]
async fn test_unsupported_extension_is_rejected() {
    let app = TestApp::new();
    let token = app.signup_and_signin("bob").await;

    let res = upload(
        &app,
        "/v1/upload/image",
        &token,
        multipart_body("file", "script.exe", b"MZ"),
    )
    .await;
    assert_eq!(res["status"], 0);
    assert_eq!(res["message"], "unsupported file type");
}

#[tokio::test]
async fn test_missing_file_part_is_rejected() {
    let app = TestApp::new();
    let token = app.signup_and_signin("carol").await;

    let res = upload(
        &app,
        "/v1/upload/file",
        &token,
        multipart_body("attachment", "notes.txt", b"hello"),
    )
    .await;
    assert_eq!(res["status"], 0);
    assert_eq!(res["message"], "please choose a file");
}

#[tokio::test]
async fn test_unknown_resource_is_not_found() {
    let app = TestApp::new();

    let res = app
        .request("GET", "/v1/resource/file/does-not-exist.txt", None, None)
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app
        .request("GET", "/v1/resource/image/..%2Fsecret.png", None, None)
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}
