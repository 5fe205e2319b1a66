//! Route Configuration
//!
//! Configures all HTTP routes for the API. Authentication is enforced by
//! the [`AuthUser`](super::extractors::AuthUser) extractor on the handlers
//! that need it, so public and protected methods can share a path.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use super::handlers;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/profiles", profile_routes())
        .nest("/posts", post_routes())
        .nest("/comments", comment_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh_token))
        .route("/logout", post(handlers::auth::logout))
        .route("/verify-email", post(handlers::auth::verify_email))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::user::list_users))
        .route("/me", get(handlers::user::get_current_user))
        .route("/{user_id}", get(handlers::user::get_user))
        .route("/{user_id}", patch(handlers::user::update_user))
        .route("/{user_id}", delete(handlers::user::delete_user))
        .route("/{user_id}/change-password", post(handlers::user::change_password))
        .route("/{user_id}/follow", post(handlers::user::follow))
        .route("/{user_id}/unfollow", delete(handlers::user::unfollow))
}

/// Profile routes (always the caller's own profile)
fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::profile::get_profile))
        .route("/", post(handlers::profile::update_profile))
        .route("/", patch(handlers::profile::update_profile))
        .route("/me", get(handlers::profile::get_profile))
}

/// Post routes
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::post::list_posts))
        .route("/", post(handlers::post::create_post))
        .route("/{post_id}", get(handlers::post::get_post))
        .route("/{post_id}", patch(handlers::post::update_post))
        .route("/{post_id}", delete(handlers::post::delete_post))
        .route("/{post_id}/like", post(handlers::post::toggle_like))
}

/// Comment routes
fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::comment::list_comments))
        .route("/", post(handlers::comment::create_comment))
        .route("/{comment_id}", get(handlers::comment::get_comment))
        .route("/{comment_id}", patch(handlers::comment::update_comment))
        .route("/{comment_id}", delete(handlers::comment::delete_comment))
        .route("/{comment_id}/report", post(handlers::comment::report_comment))
}
