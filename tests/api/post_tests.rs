//! Post API Tests
//!
//! Request-shape and authorization checks that resolve before any
//! database access.

use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_create_post_requires_token() {
    let app = TestApp::new();
    let body = json!({ "content": "hello" });

    let response = app.post_json("/api/v1/posts", &body.to_string()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_post_rejects_unknown_visibility() {
    let app = TestApp::new();
    let token = app.access_token(1);
    let body = json!({ "content": "hello", "visibility": "friends" });

    let response = app
        .post_json_auth("/api/v1/posts", &body.to_string(), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_post_rejects_whitespace_content() {
    let app = TestApp::new();
    let token = app.access_token(1);
    let body = json!({ "content": "   " });

    let response = app
        .post_json_auth("/api/v1/posts", &body.to_string(), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_post_rejects_overlong_content() {
    let app = TestApp::new();
    let token = app.access_token(1);
    let body = json!({ "content": "x".repeat(281) });

    let response = app
        .post_json_auth("/api/v1/posts", &body.to_string(), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_list_rejects_non_numeric_author() {
    let app = TestApp::new();

    let response = app.get("/api/v1/posts?author=abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_like_requires_token() {
    let app = TestApp::new();

    let response = app.post_json("/api/v1/posts/1/like", "{}").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
