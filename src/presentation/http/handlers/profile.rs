//! Profile Handlers
//!
//! Profiles always resolve to the authenticated caller; there is no
//! by-id profile endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::application::dto::request::UpdateProfileRequest;
use crate::application::dto::response::ProfileResponse;
use crate::application::services::{UpdateProfileDto, UserService, UserServiceImpl};
use crate::infrastructure::repositories::{
    PgPostRepository, PgProfileRepository, PgRelationshipRepository, PgUserRepository,
};
use crate::presentation::http::extractors::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

use super::user::map_user_error;

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

/// Get the caller's own profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = user_service(&state)
        .get_profile(auth.user_id)
        .await
        .map_err(map_user_error)?;

    Ok(Json(ProfileResponse::from(profile)))
}

/// Upsert the caller's own profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let profile = user_service(&state)
        .update_profile(
            auth.user_id,
            UpdateProfileDto {
                bio: body.bio,
                github_url: body.github_url,
                birth_date: body.birth_date,
            },
        )
        .await
        .map_err(map_user_error)?;

    Ok(Json(ProfileResponse::from(profile)))
}
