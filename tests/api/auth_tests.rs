//! Authentication API Tests
//!
//! Validation and error paths that resolve before any database access.

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{body_json, TestApp};

fn register_body() -> serde_json::Value {
    json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "Str0ng!pass",
        "password_confirm": "Str0ng!pass",
        "first_name": "Alice",
        "last_name": "Smith"
    })
}

#[tokio::test]
async fn test_register_with_invalid_email_fails() {
    let app = TestApp::new();
    let mut body = register_body();
    body["email"] = json!("not-an-email");

    let response = app
        .post_json("/api/v1/auth/register", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_validation_failure_lists_fields() {
    let app = TestApp::new();
    let mut body = register_body();
    body["email"] = json!("not-an-email");

    let response = app
        .post_json("/api/v1/auth/register", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], 10007);
    let fields: Vec<&str> = json["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&"email"));
}

#[tokio::test]
async fn test_register_with_short_username_fails() {
    let app = TestApp::new();
    let mut body = register_body();
    body["username"] = json!("abc");

    let response = app
        .post_json("/api/v1/auth/register", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let fields: Vec<&str> = json["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&"username"));
}

#[tokio::test]
async fn test_register_with_mismatched_passwords_fails() {
    let app = TestApp::new();
    let mut body = register_body();
    body["password_confirm"] = json!("Different1!pw");

    let response = app
        .post_json("/api/v1/auth/register", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_with_weak_password_fails() {
    let app = TestApp::new();
    let mut body = register_body();
    body["password"] = json!("alllowercase");
    body["password_confirm"] = json!("alllowercase");

    let response = app
        .post_json("/api/v1/auth/register", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_with_non_github_link_fails() {
    let app = TestApp::new();
    let mut body = register_body();
    body["github_url"] = json!("https://gitlab.com/alice");

    let response = app
        .post_json("/api/v1/auth/register", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_empty_username_fails() {
    let app = TestApp::new();
    let body = json!({ "username": "", "password": "whatever" });

    let response = app
        .post_json("/api/v1/auth/login", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
