//! User Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{ChangePasswordRequest, UpdateUserRequest};
use crate::application::dto::response::{MessageResponse, UserResponse};
use crate::application::services::{UpdateUserDto, UserError, UserService, UserServiceImpl};
use crate::infrastructure::repositories::{
    PgPostRepository, PgProfileRepository, PgRelationshipRepository, PgUserRepository,
};
use crate::presentation::http::extractors::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn user_service(
    state: &AppState,
) -> UserServiceImpl<PgUserRepository, PgRelationshipRepository, PgPostRepository, PgProfileRepository>
{
    UserServiceImpl::new(
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgRelationshipRepository::new(state.db.clone())),
        Arc::new(PgPostRepository::new(state.db.clone())),
        Arc::new(PgProfileRepository::new(state.db.clone())),
    )
}

pub(super) fn map_user_error(e: UserError) -> AppError {
    match e {
        UserError::NotFound => AppError::NotFound("User not found".into()),
        UserError::Forbidden => AppError::Forbidden("Permission denied".into()),
        UserError::UsernameExists => AppError::Conflict("Username already exists".into()),
        UserError::InvalidRelationship => {
            AppError::BadRequest("Users cannot follow themselves".into())
        }
        UserError::AlreadyFollowing => AppError::Conflict("Already following this user".into()),
        UserError::NotFollowing => AppError::BadRequest("Not following this user".into()),
        UserError::Internal(msg) => AppError::Internal(msg),
    }
}

/// List all users, newest first (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = user_service(&state)
        .list_users(auth.user_id)
        .await
        .map_err(map_user_error)?;

    Ok(Json(
        users
            .into_iter()
            .map(|u| UserResponse::from_user(u, false))
            .collect(),
    ))
}

/// Get the authenticated user's own account
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let dto = user_service(&state)
        .get_user(auth.user_id)
        .await
        .map_err(map_user_error)?;

    Ok(Json(UserResponse::from_dto(dto, true)))
}

/// Get a user's public projection with derived counts
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let dto = user_service(&state)
        .get_user(user_id)
        .await
        .map_err(map_user_error)?;

    Ok(Json(UserResponse::from_dto(dto, false)))
}

/// Update a user's editable fields (owner only)
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    auth: AuthUser,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let dto = user_service(&state)
        .update_user(
            auth.user_id,
            user_id,
            UpdateUserDto {
                username: body.username,
                first_name: body.first_name,
                last_name: body.last_name,
                avatar_url: body.avatar_url,
            },
        )
        .await
        .map_err(map_user_error)?;

    Ok(Json(UserResponse::from_dto(dto, true)))
}

/// Delete a user account (admin only)
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    user_service(&state)
        .delete_user(auth.user_id, user_id)
        .await
        .map_err(map_user_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Change the caller's password (owner only)
pub async fn change_password(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    auth: AuthUser,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    super::auth::change_password_for(
        &state,
        auth.user_id,
        user_id,
        &body.old_password,
        &body.new_password,
    )
    .await?;

    Ok(Json(MessageResponse::new("Password changed")))
}

/// Follow a user
pub async fn follow(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    auth: AuthUser,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    user_service(&state)
        .follow(auth.user_id, user_id)
        .await
        .map_err(map_user_error)?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new("Following"))))
}

/// Unfollow a user
pub async fn unfollow(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    user_service(&state)
        .unfollow(auth.user_id, user_id)
        .await
        .map_err(map_user_error)?;

    Ok(Json(MessageResponse::new("Unfollowed")))
}
