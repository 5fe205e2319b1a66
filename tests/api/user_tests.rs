//! User API Tests
//!
//! Authentication boundary checks on the user endpoints.

use axum::http::StatusCode;

use crate::common::TestApp;

#[tokio::test]
async fn test_current_user_requires_token() {
    let app = TestApp::new();

    let response = app.get("/api/v1/users/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = TestApp::new();

    let response = app.get_auth("/api/v1/users/me", "not.a.jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = TestApp::new();

    // Signed with a different secret than the app's
    let forged = {
        use chrono::Utc;
        use jsonwebtoken::{encode, EncodingKey, Header};
        use social_server::application::services::Claims;

        let now = Utc::now().timestamp();
        encode(
            &Header::default(),
            &Claims {
                sub: "1".to_string(),
                iat: now,
                exp: now + 900,
            },
            &EncodingKey::from_secret(b"some-other-secret-0123456789abcdef"),
        )
        .unwrap()
    };

    let response = app.get_auth("/api/v1/users/me", &forged).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_list_requires_token() {
    let app = TestApp::new();

    let response = app.get("/api/v1/users").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
