//! User Service
//!
//! User reads and edits, profile management, and follow/unfollow
//! bookkeeping.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::domain::{
    Action, Actor, PolicyService, PostRepository, Profile, ProfileRepository, Relationship,
    RelationshipRepository, User, UserRepository,
};

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get a user with derived follower/post counts
    async fn get_user(&self, user_id: i64) -> Result<UserDto, UserError>;

    /// List all users, newest first (admin only)
    async fn list_users(&self, actor_id: i64) -> Result<Vec<User>, UserError>;

    /// Update a user's editable fields (owner only)
    async fn update_user(
        &self,
        actor_id: i64,
        target_id: i64,
        update: UpdateUserDto,
    ) -> Result<UserDto, UserError>;

    /// Delete a user account (admin only)
    async fn delete_user(&self, actor_id: i64, target_id: i64) -> Result<(), UserError>;

    /// Create a follow edge from actor to target
    async fn follow(&self, actor_id: i64, target_id: i64) -> Result<(), UserError>;

    /// Remove the follow edge from actor to target
    async fn unfollow(&self, actor_id: i64, target_id: i64) -> Result<(), UserError>;

    /// Get the caller's own profile
    async fn get_profile(&self, user_id: i64) -> Result<Profile, UserError>;

    /// Upsert the caller's own profile
    async fn update_profile(
        &self,
        user_id: i64,
        update: UpdateProfileDto,
    ) -> Result<Profile, UserError>;
}

/// User data with per-request derived counts
#[derive(Debug, Clone)]
pub struct UserDto {
    pub user: User,
    pub followers_count: i64,
    pub following_count: i64,
    pub posts_count: i64,
}

/// Editable account fields
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Editable profile fields
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileDto {
    pub bio: Option<String>,
    pub github_url: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Permission denied")]
    Forbidden,

    #[error("Username already exists")]
    UsernameExists,

    #[error("Users cannot follow themselves")]
    InvalidRelationship,

    #[error("Already following")]
    AlreadyFollowing,

    #[error("Not following")]
    NotFollowing,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// UserService implementation
pub struct UserServiceImpl<U, R, P, Pr>
where
    U: UserRepository,
    R: RelationshipRepository,
    P: PostRepository,
    Pr: ProfileRepository,
{
    user_repo: Arc<U>,
    relationship_repo: Arc<R>,
    post_repo: Arc<P>,
    profile_repo: Arc<Pr>,
}

impl<U, R, P, Pr> UserServiceImpl<U, R, P, Pr>
where
    U: UserRepository,
    R: RelationshipRepository,
    P: PostRepository,
    Pr: ProfileRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        relationship_repo: Arc<R>,
        post_repo: Arc<P>,
        profile_repo: Arc<Pr>,
    ) -> Self {
        Self {
            user_repo,
            relationship_repo,
            post_repo,
            profile_repo,
        }
    }

    async fn load_actor(&self, actor_id: i64) -> Result<Actor, UserError> {
        let user = self
            .user_repo
            .find_by_id(actor_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::NotFound)?;

        Ok(Actor::new(user.id, user.role))
    }

    async fn build_dto(&self, user: User) -> Result<UserDto, UserError> {
        let followers_count = self
            .relationship_repo
            .count_followers(user.id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;
        let following_count = self
            .relationship_repo
            .count_following(user.id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;
        let posts_count = self
            .post_repo
            .count_by_author(user.id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;

        Ok(UserDto {
            user,
            followers_count,
            following_count,
            posts_count,
        })
    }
}

#[async_trait]
impl<U, R, P, Pr> UserService for UserServiceImpl<U, R, P, Pr>
where
    U: UserRepository + 'static,
    R: RelationshipRepository + 'static,
    P: PostRepository + 'static,
    Pr: ProfileRepository + 'static,
{
    async fn get_user(&self, user_id: i64) -> Result<UserDto, UserError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::NotFound)?;

        self.build_dto(user).await
    }

    async fn list_users(&self, actor_id: i64) -> Result<Vec<User>, UserError> {
        let actor = self.load_actor(actor_id).await?;
        if !PolicyService::allows(&actor, Action::ListUsers) {
            return Err(UserError::Forbidden);
        }

        self.user_repo
            .find_all()
            .await
            .map_err(|e| UserError::Internal(e.to_string()))
    }

    async fn update_user(
        &self,
        actor_id: i64,
        target_id: i64,
        update: UpdateUserDto,
    ) -> Result<UserDto, UserError> {
        let actor = self.load_actor(actor_id).await?;
        if !PolicyService::allows(&actor, Action::UpdateUser { target_id }) {
            return Err(UserError::Forbidden);
        }

        let mut user = self
            .user_repo
            .find_by_id(target_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::NotFound)?;

        if let Some(username) = update.username {
            if username != user.username {
                let taken = self
                    .user_repo
                    .username_exists(&username)
                    .await
                    .map_err(|e| UserError::Internal(e.to_string()))?;
                if taken {
                    return Err(UserError::UsernameExists);
                }
                user.username = username;
            }
        }
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(avatar_url) = update.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        user.updated_at = Utc::now();

        let updated = self
            .user_repo
            .update(&user)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;

        self.build_dto(updated).await
    }

    async fn delete_user(&self, actor_id: i64, target_id: i64) -> Result<(), UserError> {
        let actor = self.load_actor(actor_id).await?;
        if !PolicyService::allows(&actor, Action::DeleteUser) {
            return Err(UserError::Forbidden);
        }

        self.user_repo
            .find_by_id(target_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::NotFound)?;

        self.user_repo
            .delete(target_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))
    }

    async fn follow(&self, actor_id: i64, target_id: i64) -> Result<(), UserError> {
        if actor_id == target_id {
            return Err(UserError::InvalidRelationship);
        }

        self.user_repo
            .find_by_id(target_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::NotFound)?;

        let exists = self
            .relationship_repo
            .exists(actor_id, target_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;
        if exists {
            return Err(UserError::AlreadyFollowing);
        }

        self.relationship_repo
            .create(&Relationship::new(actor_id, target_id))
            .await
            .map_err(|e| match e {
                // A racing duplicate insert surfaces through the pair
                // constraint; report it the same way as the exists check.
                crate::shared::error::AppError::Conflict(_) => UserError::AlreadyFollowing,
                other => UserError::Internal(other.to_string()),
            })
    }

    async fn unfollow(&self, actor_id: i64, target_id: i64) -> Result<(), UserError> {
        self.user_repo
            .find_by_id(target_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::NotFound)?;

        let removed = self
            .relationship_repo
            .delete(actor_id, target_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;

        if !removed {
            return Err(UserError::NotFollowing);
        }
        Ok(())
    }

    async fn get_profile(&self, user_id: i64) -> Result<Profile, UserError> {
        self.profile_repo
            .find_by_user(user_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::NotFound)
    }

    async fn update_profile(
        &self,
        user_id: i64,
        update: UpdateProfileDto,
    ) -> Result<Profile, UserError> {
        let mut profile = self
            .profile_repo
            .find_by_user(user_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .unwrap_or_else(|| Profile::empty(user_id));

        if update.bio.is_some() {
            profile.bio = update.bio;
        }
        if update.github_url.is_some() {
            profile.github_url = update.github_url;
        }
        if update.birth_date.is_some() {
            profile.birth_date = update.birth_date;
        }
        profile.updated_at = Utc::now();

        self.profile_repo
            .upsert(&profile)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))
    }
}
