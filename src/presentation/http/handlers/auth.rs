//! Authentication Handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::application::dto::request::{
    LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest, VerifyEmailRequest,
};
use crate::application::dto::response::{
    MessageResponse, RegisterResponse, TokenResponse, UserResponse,
};
use crate::application::services::{AuthError, AuthService, AuthServiceImpl, RegisterUserDto};
use crate::infrastructure::repositories::{
    PgSessionRepository, PgUserRepository, PgVerificationTokenRepository,
};
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn auth_service(
    state: &AppState,
) -> AuthServiceImpl<PgUserRepository, PgSessionRepository, PgVerificationTokenRepository> {
    AuthServiceImpl::new(
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgSessionRepository::new(state.db.clone())),
        Arc::new(PgVerificationTokenRepository::new(state.db.clone())),
        state.snowflake.clone(),
        state.settings.jwt.clone(),
    )
}

fn map_auth_error(e: AuthError) -> AppError {
    match e {
        AuthError::InvalidCredentials => AppError::Unauthorized("Invalid credentials".into()),
        AuthError::AccountDisabled => {
            AppError::Forbidden("Account is not active. Verify your email first".into())
        }
        AuthError::Forbidden => AppError::Forbidden("Permission denied".into()),
        AuthError::TokenExpired => AppError::Unauthorized("Token expired".into()),
        AuthError::InvalidToken => AppError::BadRequest("Invalid or used token".into()),
        AuthError::UserNotFound => AppError::NotFound("User not found".into()),
        AuthError::EmailExists => AppError::Conflict("Email already exists".into()),
        AuthError::UsernameExists => AppError::Conflict("Username already exists".into()),
        AuthError::SessionNotFound => {
            AppError::Unauthorized("Session not found or expired".into())
        }
        AuthError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Register a new user account
///
/// The account starts inactive; the verification token is issued in the
/// same transaction and would be delivered out of band.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let (user, token) = auth_service(&state)
        .register(RegisterUserDto {
            username: body.username,
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
            bio: body.bio,
            github_url: body.github_url,
            birth_date: body.birth_date,
            avatar_url: body.avatar_url,
        })
        .await
        .map_err(map_auth_error)?;

    tracing::debug!(user_id = %user.id, token = %token.token, "Verification token issued");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserResponse::from_user(user, true),
            message: "Registration successful. Verify your email to activate the account".into(),
        }),
    ))
}

/// Login with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let tokens = auth_service(&state)
        .authenticate(&body.username, &body.password)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(TokenResponse::from(tokens)))
}

/// Rotate the refresh token and issue a new access token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let tokens = auth_service(&state)
        .refresh_token(&body.refresh_token)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(TokenResponse::from(tokens)))
}

/// Revoke the session behind a refresh token
pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<LogoutRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_service(&state)
        .revoke_token(&body.refresh_token)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(MessageResponse::new("Logged out")))
}

/// Change a user's password after verifying the old one.
///
/// Routed under `/users/{id}/change-password`; the service gates the
/// mutation through the authorization policy.
pub(super) async fn change_password_for(
    state: &AppState,
    actor_id: i64,
    target_id: i64,
    old_password: &str,
    new_password: &str,
) -> Result<(), AppError> {
    auth_service(state)
        .change_password(actor_id, target_id, old_password, new_password)
        .await
        .map_err(map_auth_error)
}

/// Consume an email verification token, activating its user
pub async fn verify_email(
    State(state): State<AppState>,
    Json(body): Json<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_service(&state)
        .verify_email(&body.token)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(MessageResponse::new("Email verified")))
}
