//! Post Service
//!
//! Post CRUD and like toggling. Content rules live here; visibility only
//! gates commenting, reads stay open.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Action, Actor, LikeRepository, LikeToggle, PolicyService, Post, PostDetails, PostRepository,
    UserRepository, Visibility, MAX_POST_LENGTH,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// Post service trait
#[async_trait]
pub trait PostService: Send + Sync {
    /// Create a post owned by the actor
    async fn create_post(
        &self,
        author_id: i64,
        create: CreatePostDto,
    ) -> Result<PostDetails, PostError>;

    /// List posts newest first, optionally scoped to one author
    async fn list_posts(&self, author_id: Option<i64>) -> Result<Vec<PostDetails>, PostError>;

    /// Get one post with derived data
    async fn get_post(&self, post_id: i64) -> Result<PostDetails, PostError>;

    /// Update a post (owner only)
    async fn update_post(
        &self,
        actor_id: i64,
        post_id: i64,
        update: UpdatePostDto,
    ) -> Result<PostDetails, PostError>;

    /// Delete a post (owner or admin)
    async fn delete_post(&self, actor_id: i64, post_id: i64) -> Result<(), PostError>;

    /// Toggle the actor's like on a post
    async fn toggle_like(&self, actor_id: i64, post_id: i64) -> Result<LikeOutcome, PostError>;
}

/// Fields for creating a post
#[derive(Debug, Clone)]
pub struct CreatePostDto {
    pub content: String,
    pub visibility: Visibility,
    pub image_url: Option<String>,
}

/// Fields for editing a post
#[derive(Debug, Clone, Default)]
pub struct UpdatePostDto {
    pub content: Option<String>,
    pub visibility: Option<Visibility>,
    pub image_url: Option<String>,
}

/// Result of a like toggle with the post's fresh count
#[derive(Debug, Clone, Copy)]
pub struct LikeOutcome {
    pub toggle: LikeToggle,
    pub likes_count: i64,
}

/// Post service errors
#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Post not found")]
    NotFound,

    #[error("Permission denied")]
    Forbidden,

    #[error("Post content must be 1 to 280 characters")]
    InvalidContent,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// PostService implementation
pub struct PostServiceImpl<P, L, U>
where
    P: PostRepository,
    L: LikeRepository,
    U: UserRepository,
{
    post_repo: Arc<P>,
    like_repo: Arc<L>,
    user_repo: Arc<U>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<P, L, U> PostServiceImpl<P, L, U>
where
    P: PostRepository,
    L: LikeRepository,
    U: UserRepository,
{
    pub fn new(
        post_repo: Arc<P>,
        like_repo: Arc<L>,
        user_repo: Arc<U>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            post_repo,
            like_repo,
            user_repo,
            id_generator,
        }
    }

    async fn load_actor(&self, actor_id: i64) -> Result<Actor, PostError> {
        let user = self
            .user_repo
            .find_by_id(actor_id)
            .await
            .map_err(|e| PostError::Internal(e.to_string()))?
            .ok_or(PostError::Forbidden)?;

        Ok(Actor::new(user.id, user.role))
    }

    fn validate_content(content: &str) -> Result<String, PostError> {
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_POST_LENGTH {
            return Err(PostError::InvalidContent);
        }
        Ok(trimmed.to_string())
    }
}

#[async_trait]
impl<P, L, U> PostService for PostServiceImpl<P, L, U>
where
    P: PostRepository + 'static,
    L: LikeRepository + 'static,
    U: UserRepository + 'static,
{
    async fn create_post(
        &self,
        author_id: i64,
        create: CreatePostDto,
    ) -> Result<PostDetails, PostError> {
        let content = Self::validate_content(&create.content)?;

        let now = Utc::now();
        let post = Post {
            id: self.id_generator.generate(),
            author_id,
            content,
            image_url: create.image_url,
            visibility: create.visibility,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .post_repo
            .create(&post)
            .await
            .map_err(|e| PostError::Internal(e.to_string()))?;

        self.post_repo
            .find_details(created.id)
            .await
            .map_err(|e| PostError::Internal(e.to_string()))?
            .ok_or_else(|| PostError::Internal("post vanished after insert".to_string()))
    }

    async fn list_posts(&self, author_id: Option<i64>) -> Result<Vec<PostDetails>, PostError> {
        self.post_repo
            .list(author_id)
            .await
            .map_err(|e| PostError::Internal(e.to_string()))
    }

    async fn get_post(&self, post_id: i64) -> Result<PostDetails, PostError> {
        self.post_repo
            .find_details(post_id)
            .await
            .map_err(|e| PostError::Internal(e.to_string()))?
            .ok_or(PostError::NotFound)
    }

    async fn update_post(
        &self,
        actor_id: i64,
        post_id: i64,
        update: UpdatePostDto,
    ) -> Result<PostDetails, PostError> {
        let mut post = self
            .post_repo
            .find_by_id(post_id)
            .await
            .map_err(|e| PostError::Internal(e.to_string()))?
            .ok_or(PostError::NotFound)?;

        let actor = self.load_actor(actor_id).await?;
        if !PolicyService::allows(&actor, Action::UpdatePost { author_id: post.author_id }) {
            return Err(PostError::Forbidden);
        }

        if let Some(content) = update.content {
            post.content = Self::validate_content(&content)?;
        }
        if let Some(visibility) = update.visibility {
            post.visibility = visibility;
        }
        if let Some(image_url) = update.image_url {
            post.image_url = Some(image_url);
        }
        post.updated_at = Utc::now();

        let updated = self
            .post_repo
            .update(&post)
            .await
            .map_err(|e| PostError::Internal(e.to_string()))?;

        self.post_repo
            .find_details(updated.id)
            .await
            .map_err(|e| PostError::Internal(e.to_string()))?
            .ok_or(PostError::NotFound)
    }

    async fn delete_post(&self, actor_id: i64, post_id: i64) -> Result<(), PostError> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await
            .map_err(|e| PostError::Internal(e.to_string()))?
            .ok_or(PostError::NotFound)?;

        let actor = self.load_actor(actor_id).await?;
        if !PolicyService::allows(&actor, Action::DeletePost { author_id: post.author_id }) {
            return Err(PostError::Forbidden);
        }

        self.post_repo
            .delete(post_id)
            .await
            .map_err(|e| PostError::Internal(e.to_string()))
    }

    async fn toggle_like(&self, actor_id: i64, post_id: i64) -> Result<LikeOutcome, PostError> {
        self.post_repo
            .find_by_id(post_id)
            .await
            .map_err(|e| PostError::Internal(e.to_string()))?
            .ok_or(PostError::NotFound)?;

        let toggle = self
            .like_repo
            .toggle(actor_id, post_id)
            .await
            .map_err(|e| PostError::Internal(e.to_string()))?;

        let likes_count = self
            .like_repo
            .count_for_post(post_id)
            .await
            .map_err(|e| PostError::Internal(e.to_string()))?;

        Ok(LikeOutcome { toggle, likes_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        MockLikeRepository, MockPostRepository, MockUserRepository, User, UserRole,
    };
    use mockall::predicate::eq;

    fn stub_user(id: i64, role: UserRole) -> User {
        let mut user = User::default();
        user.id = id;
        user.role = role;
        user.is_active = true;
        user
    }

    fn stub_post(id: i64, author_id: i64) -> Post {
        let now = Utc::now();
        Post {
            id,
            author_id,
            content: "hello".to_string(),
            image_url: None,
            visibility: Visibility::Public,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(
        post_repo: MockPostRepository,
        like_repo: MockLikeRepository,
        user_repo: MockUserRepository,
    ) -> PostServiceImpl<MockPostRepository, MockLikeRepository, MockUserRepository> {
        PostServiceImpl::new(
            Arc::new(post_repo),
            Arc::new(like_repo),
            Arc::new(user_repo),
            Arc::new(SnowflakeGenerator::new(1, 0)),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_blank_content() {
        let svc = service(
            MockPostRepository::new(),
            MockLikeRepository::new(),
            MockUserRepository::new(),
        );

        let result = svc
            .create_post(
                1,
                CreatePostDto {
                    content: "   ".to_string(),
                    visibility: Visibility::Public,
                    image_url: None,
                },
            )
            .await;
        assert!(matches!(result, Err(PostError::InvalidContent)));
    }

    #[tokio::test]
    async fn test_create_rejects_overlong_content() {
        let svc = service(
            MockPostRepository::new(),
            MockLikeRepository::new(),
            MockUserRepository::new(),
        );

        let result = svc
            .create_post(
                1,
                CreatePostDto {
                    content: "x".repeat(MAX_POST_LENGTH + 1),
                    visibility: Visibility::Private,
                    image_url: None,
                },
            )
            .await;
        assert!(matches!(result, Err(PostError::InvalidContent)));
    }

    #[tokio::test]
    async fn test_create_trims_content() {
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_create()
            .withf(|post| post.content == "hello")
            .returning(|post| Ok(post.clone()));
        post_repo.expect_find_details().returning(|id| {
            Ok(Some(PostDetails {
                post: stub_post(id, 1),
                author_username: "alice".to_string(),
                likes_count: 0,
            }))
        });

        let svc = service(post_repo, MockLikeRepository::new(), MockUserRepository::new());

        let result = svc
            .create_post(
                1,
                CreatePostDto {
                    content: "  hello  ".to_string(),
                    visibility: Visibility::Public,
                    image_url: None,
                },
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_forbidden() {
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_find_by_id()
            .with(eq(100))
            .returning(|id| Ok(Some(stub_post(id, 1))));

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .with(eq(2))
            .returning(|id| Ok(Some(stub_user(id, UserRole::Admin))));

        let svc = service(post_repo, MockLikeRepository::new(), user_repo);

        // Admins may delete posts but not edit them
        let result = svc.update_post(2, 100, UpdatePostDto::default()).await;
        assert!(matches!(result, Err(PostError::Forbidden)));
    }

    #[tokio::test]
    async fn test_delete_by_admin_is_allowed() {
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_find_by_id()
            .with(eq(100))
            .returning(|id| Ok(Some(stub_post(id, 1))));
        post_repo.expect_delete().with(eq(100)).returning(|_| Ok(()));

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .with(eq(2))
            .returning(|id| Ok(Some(stub_user(id, UserRole::Admin))));

        let svc = service(post_repo, MockLikeRepository::new(), user_repo);

        assert!(svc.delete_post(2, 100).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_by_other_user_is_forbidden() {
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_find_by_id()
            .with(eq(100))
            .returning(|id| Ok(Some(stub_post(id, 1))));

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(stub_user(id, UserRole::User))));

        let svc = service(post_repo, MockLikeRepository::new(), user_repo);

        let result = svc.delete_post(3, 100).await;
        assert!(matches!(result, Err(PostError::Forbidden)));
    }

    #[tokio::test]
    async fn test_toggle_like_reports_fresh_count() {
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_find_by_id()
            .with(eq(100))
            .returning(|id| Ok(Some(stub_post(id, 1))));

        let mut like_repo = MockLikeRepository::new();
        like_repo
            .expect_toggle()
            .with(eq(7), eq(100))
            .returning(|_, _| Ok(LikeToggle::Liked));
        like_repo
            .expect_count_for_post()
            .with(eq(100))
            .returning(|_| Ok(3));

        let svc = service(post_repo, like_repo, MockUserRepository::new());

        let outcome = svc.toggle_like(7, 100).await.unwrap();
        assert_eq!(outcome.toggle, LikeToggle::Liked);
        assert_eq!(outcome.likes_count, 3);
    }

    #[tokio::test]
    async fn test_toggle_like_on_missing_post_is_not_found() {
        let mut post_repo = MockPostRepository::new();
        post_repo.expect_find_by_id().returning(|_| Ok(None));

        let svc = service(post_repo, MockLikeRepository::new(), MockUserRepository::new());

        let result = svc.toggle_like(7, 999).await;
        assert!(matches!(result, Err(PostError::NotFound)));
    }
}
