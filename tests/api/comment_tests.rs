//! Comment API Tests
//!
//! Request-shape checks and the tolerant post filter.

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn test_create_comment_requires_token() {
    let app = TestApp::new();
    let body = json!({ "post": 1, "content": "hello" });

    let response = app.post_json("/api/v1/comments", &body.to_string()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_comment_rejects_whitespace_content() {
    let app = TestApp::new();
    let token = app.access_token(1);
    let body = json!({ "post": 1, "content": "   " });

    let response = app
        .post_json_auth("/api/v1/comments", &body.to_string(), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_comment_rejects_overlong_content() {
    let app = TestApp::new();
    let token = app.access_token(1);
    let body = json!({ "post": 1, "content": "x".repeat(281) });

    let response = app
        .post_json_auth("/api/v1/comments", &body.to_string(), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_numeric_post_filter_yields_empty_list() {
    let app = TestApp::new();

    let response = app.get("/api/v1/comments?post=abc").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn test_report_requires_token() {
    let app = TestApp::new();

    let response = app.post_json("/api/v1/comments/1/report", "{}").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
