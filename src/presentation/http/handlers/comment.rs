//! Comment Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{
    CommentListQuery, CreateCommentRequest, UpdateCommentRequest,
};
use crate::application::dto::response::{CommentResponse, StatusResponse};
use crate::application::services::{
    CommentError, CommentService, CommentServiceImpl, CreateCommentDto,
};
use crate::infrastructure::repositories::{
    PgCommentRepository, PgPostRepository, PgRelationshipRepository, PgUserRepository,
};
use crate::presentation::http::extractors::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn comment_service(
    state: &AppState,
) -> CommentServiceImpl<
    PgCommentRepository,
    PgPostRepository,
    PgRelationshipRepository,
    PgUserRepository,
> {
    CommentServiceImpl::new(
        Arc::new(PgCommentRepository::new(state.db.clone())),
        Arc::new(PgPostRepository::new(state.db.clone())),
        Arc::new(PgRelationshipRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}

fn map_comment_error(e: CommentError) -> AppError {
    match e {
        CommentError::NotFound => AppError::NotFound("Comment not found".into()),
        CommentError::PostNotFound => AppError::NotFound("Post not found".into()),
        CommentError::InvalidContent => {
            AppError::BadRequest("Content must be 1 to 280 characters".into())
        }
        CommentError::Forbidden => {
            AppError::Forbidden("Only users the author follows may comment on this post".into())
        }
        CommentError::InvalidParent => {
            AppError::BadRequest("Parent comment must belong to the same post".into())
        }
        CommentError::MaxDepthExceeded => {
            AppError::BadRequest("Maximum reply depth exceeded".into())
        }
        CommentError::Internal(msg) => AppError::Internal(msg),
    }
}

/// List comments newest first, optionally filtered by post.
///
/// A non-numeric post filter matches nothing and yields an empty list.
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let post_id = match query.post.as_deref() {
        Some(raw) => match raw.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => return Ok(Json(Vec::new())),
        },
        None => None,
    };

    let comments = comment_service(&state)
        .list_comments(post_id)
        .await
        .map_err(map_comment_error)?;

    Ok(Json(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

/// Create a comment or reply
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let dto = comment_service(&state)
        .create_comment(
            auth.user_id,
            CreateCommentDto {
                post_id: body.post,
                parent_id: body.parent,
                content: body.content,
            },
        )
        .await
        .map_err(map_comment_error)?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(dto))))
}

/// Get one comment with derived data
pub async fn get_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> Result<Json<CommentResponse>, AppError> {
    let dto = comment_service(&state)
        .get_comment(comment_id)
        .await
        .map_err(map_comment_error)?;

    Ok(Json(CommentResponse::from(dto)))
}

/// Update a comment's content (owner only)
pub async fn update_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    auth: AuthUser,
    Json(body): Json<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let dto = comment_service(&state)
        .update_comment(auth.user_id, comment_id, body.content)
        .await
        .map_err(map_comment_error)?;

    Ok(Json(CommentResponse::from(dto)))
}

/// Delete a comment (owner, admin, or moderator)
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    comment_service(&state)
        .delete_comment(auth.user_id, comment_id)
        .await
        .map_err(map_comment_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Report a comment for review
pub async fn report_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    auth: AuthUser,
) -> Result<Json<StatusResponse>, AppError> {
    comment_service(&state)
        .report_comment(auth.user_id, comment_id)
        .await
        .map_err(map_comment_error)?;

    Ok(Json(StatusResponse::new("comment reported")))
}
