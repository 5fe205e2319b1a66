//! Post Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{CreatePostRequest, PostListQuery, UpdatePostRequest};
use crate::application::dto::response::{LikeToggleResponse, PostResponse};
use crate::application::services::{
    CreatePostDto, PostError, PostService, PostServiceImpl, UpdatePostDto,
};
use crate::domain::Visibility;
use crate::infrastructure::repositories::{PgLikeRepository, PgPostRepository, PgUserRepository};
use crate::presentation::http::extractors::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn post_service(
    state: &AppState,
) -> PostServiceImpl<PgPostRepository, PgLikeRepository, PgUserRepository> {
    PostServiceImpl::new(
        Arc::new(PgPostRepository::new(state.db.clone())),
        Arc::new(PgLikeRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}

fn map_post_error(e: PostError) -> AppError {
    match e {
        PostError::NotFound => AppError::NotFound("Post not found".into()),
        PostError::Forbidden => AppError::Forbidden("Permission denied".into()),
        PostError::InvalidContent => {
            AppError::BadRequest("Content must be 1 to 280 characters".into())
        }
        PostError::Internal(msg) => AppError::Internal(msg),
    }
}

fn parse_visibility(value: Option<String>) -> Result<Option<Visibility>, AppError> {
    match value {
        None => Ok(None),
        Some(raw) => Visibility::parse(&raw)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown visibility '{}'", raw))),
    }
}

/// List posts newest first, optionally filtered by author
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let author_id = match query.author.as_deref() {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| AppError::BadRequest("Author filter must be numeric".into()))?,
        ),
        None => None,
    };

    let posts = post_service(&state)
        .list_posts(author_id)
        .await
        .map_err(map_post_error)?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// Create a post owned by the caller
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    body.validate().map_err(validation_error)?;
    let visibility = parse_visibility(body.visibility)?.unwrap_or_default();

    let details = post_service(&state)
        .create_post(
            auth.user_id,
            CreatePostDto {
                content: body.content,
                visibility,
                image_url: body.image_url,
            },
        )
        .await
        .map_err(map_post_error)?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(details))))
}

/// Get one post with likes and author data
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostResponse>, AppError> {
    let details = post_service(&state)
        .get_post(post_id)
        .await
        .map_err(map_post_error)?;

    Ok(Json(PostResponse::from(details)))
}

/// Update a post (owner only)
pub async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    auth: AuthUser,
    Json(body): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    body.validate().map_err(validation_error)?;
    let visibility = parse_visibility(body.visibility)?;

    let details = post_service(&state)
        .update_post(
            auth.user_id,
            post_id,
            UpdatePostDto {
                content: body.content,
                visibility,
                image_url: body.image_url,
            },
        )
        .await
        .map_err(map_post_error)?;

    Ok(Json(PostResponse::from(details)))
}

/// Delete a post (owner or admin)
pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    post_service(&state)
        .delete_post(auth.user_id, post_id)
        .await
        .map_err(map_post_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Toggle the caller's like on a post
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    auth: AuthUser,
) -> Result<Json<LikeToggleResponse>, AppError> {
    let outcome = post_service(&state)
        .toggle_like(auth.user_id, post_id)
        .await
        .map_err(map_post_error)?;

    Ok(Json(LikeToggleResponse {
        status: outcome.toggle.as_str().to_string(),
        likes_count: outcome.likes_count,
    }))
}
