//! Comment Service
//!
//! Threaded comments on posts. Creation runs a fixed validation sequence:
//! content rules first, then the private-post gate, then the bounded
//! depth walk over the parent chain.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Action, Actor, Comment, CommentDetails, CommentRepository, PolicyService, PostRepository,
    RelationshipRepository, UserRepository, Visibility, MAX_COMMENT_LENGTH, MAX_THREAD_DEPTH,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// Comment service trait
#[async_trait]
pub trait CommentService: Send + Sync {
    /// Create a comment or reply
    async fn create_comment(
        &self,
        author_id: i64,
        create: CreateCommentDto,
    ) -> Result<CommentDto, CommentError>;

    /// List comments newest first, optionally scoped to one post
    async fn list_comments(&self, post_id: Option<i64>) -> Result<Vec<CommentDto>, CommentError>;

    /// Get one comment with derived data
    async fn get_comment(&self, comment_id: i64) -> Result<CommentDto, CommentError>;

    /// Update a comment's content (owner only)
    async fn update_comment(
        &self,
        actor_id: i64,
        comment_id: i64,
        content: String,
    ) -> Result<CommentDto, CommentError>;

    /// Delete a comment (owner, admin, or moderator)
    async fn delete_comment(&self, actor_id: i64, comment_id: i64) -> Result<(), CommentError>;

    /// Record a report against a comment
    async fn report_comment(&self, actor_id: i64, comment_id: i64) -> Result<(), CommentError>;
}

/// Fields for creating a comment
#[derive(Debug, Clone)]
pub struct CreateCommentDto {
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
}

/// A comment joined with its derived read-only values
#[derive(Debug, Clone)]
pub struct CommentDto {
    pub comment: Comment,
    pub author_username: String,
    pub replies_count: i64,
    pub thread_depth: usize,
}

/// Comment service errors
#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("Comment not found")]
    NotFound,

    #[error("Post not found")]
    PostNotFound,

    #[error("Comment content must be 1 to 280 characters")]
    InvalidContent,

    #[error("Permission denied")]
    Forbidden,

    #[error("Parent comment must belong to the same post")]
    InvalidParent,

    #[error("Maximum reply depth of {MAX_THREAD_DEPTH} exceeded")]
    MaxDepthExceeded,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// CommentService implementation
pub struct CommentServiceImpl<C, P, R, U>
where
    C: CommentRepository,
    P: PostRepository,
    R: RelationshipRepository,
    U: UserRepository,
{
    comment_repo: Arc<C>,
    post_repo: Arc<P>,
    relationship_repo: Arc<R>,
    user_repo: Arc<U>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<C, P, R, U> CommentServiceImpl<C, P, R, U>
where
    C: CommentRepository,
    P: PostRepository,
    R: RelationshipRepository,
    U: UserRepository,
{
    pub fn new(
        comment_repo: Arc<C>,
        post_repo: Arc<P>,
        relationship_repo: Arc<R>,
        user_repo: Arc<U>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            relationship_repo,
            user_repo,
            id_generator,
        }
    }

    async fn load_actor(&self, actor_id: i64) -> Result<Actor, CommentError> {
        let user = self
            .user_repo
            .find_by_id(actor_id)
            .await
            .map_err(|e| CommentError::Internal(e.to_string()))?
            .ok_or(CommentError::Forbidden)?;

        Ok(Actor::new(user.id, user.role))
    }

    fn validate_content(content: &str) -> Result<String, CommentError> {
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_COMMENT_LENGTH {
            return Err(CommentError::InvalidContent);
        }
        Ok(trimmed.to_string())
    }

    /// Count the parent's ancestors, giving up once the new reply would
    /// land past [`MAX_THREAD_DEPTH`]. The walk is bounded, so a cyclic
    /// chain in bad data cannot hang the request.
    async fn check_depth(&self, parent: &Comment) -> Result<(), CommentError> {
        let mut ancestors = 0usize;
        let mut current_parent = parent.parent_id;

        while let Some(parent_id) = current_parent {
            ancestors += 1;
            if ancestors >= MAX_THREAD_DEPTH {
                return Err(CommentError::MaxDepthExceeded);
            }

            let ancestor = self
                .comment_repo
                .find_by_id(parent_id)
                .await
                .map_err(|e| CommentError::Internal(e.to_string()))?
                .ok_or(CommentError::InvalidParent)?;
            current_parent = ancestor.parent_id;
        }

        Ok(())
    }

    /// Walk the parent chain of a stored comment to its root.
    async fn thread_depth_of(&self, comment: &Comment) -> Result<usize, CommentError> {
        let mut depth = 0usize;
        let mut current_parent = comment.parent_id;

        while let Some(parent_id) = current_parent {
            depth += 1;
            if depth > MAX_THREAD_DEPTH {
                break;
            }
            current_parent = self
                .comment_repo
                .find_by_id(parent_id)
                .await
                .map_err(|e| CommentError::Internal(e.to_string()))?
                .and_then(|parent| parent.parent_id);
        }

        Ok(depth)
    }

    async fn build_dto(&self, details: CommentDetails) -> Result<CommentDto, CommentError> {
        let thread_depth = self.thread_depth_of(&details.comment).await?;
        Ok(CommentDto {
            comment: details.comment,
            author_username: details.author_username,
            replies_count: details.replies_count,
            thread_depth,
        })
    }
}

#[async_trait]
impl<C, P, R, U> CommentService for CommentServiceImpl<C, P, R, U>
where
    C: CommentRepository + 'static,
    P: PostRepository + 'static,
    R: RelationshipRepository + 'static,
    U: UserRepository + 'static,
{
    async fn create_comment(
        &self,
        author_id: i64,
        create: CreateCommentDto,
    ) -> Result<CommentDto, CommentError> {
        // 1. Content rules run before anything touches the post.
        let content = Self::validate_content(&create.content)?;

        let post = self
            .post_repo
            .find_by_id(create.post_id)
            .await
            .map_err(|e| CommentError::Internal(e.to_string()))?
            .ok_or(CommentError::PostNotFound)?;

        // 2. Private posts only take comments from users the author follows.
        if post.visibility == Visibility::Private && author_id != post.author_id {
            let followed_by_author = self
                .relationship_repo
                .exists(post.author_id, author_id)
                .await
                .map_err(|e| CommentError::Internal(e.to_string()))?;
            if !followed_by_author {
                return Err(CommentError::Forbidden);
            }
        }

        // 3. Replies must stay on the same post and within the depth limit.
        if let Some(parent_id) = create.parent_id {
            let parent = self
                .comment_repo
                .find_by_id(parent_id)
                .await
                .map_err(|e| CommentError::Internal(e.to_string()))?
                .ok_or(CommentError::InvalidParent)?;

            if parent.post_id != post.id {
                return Err(CommentError::InvalidParent);
            }

            self.check_depth(&parent).await?;
        }

        let now = Utc::now();
        let comment = Comment {
            id: self.id_generator.generate(),
            author_id,
            post_id: post.id,
            parent_id: create.parent_id,
            content,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .comment_repo
            .create(&comment)
            .await
            .map_err(|e| CommentError::Internal(e.to_string()))?;

        let details = self
            .comment_repo
            .find_details(created.id)
            .await
            .map_err(|e| CommentError::Internal(e.to_string()))?
            .ok_or_else(|| CommentError::Internal("comment vanished after insert".to_string()))?;

        self.build_dto(details).await
    }

    async fn list_comments(&self, post_id: Option<i64>) -> Result<Vec<CommentDto>, CommentError> {
        let details = match post_id {
            Some(post_id) => self.comment_repo.list_by_post(post_id).await,
            None => self.comment_repo.list_all().await,
        }
        .map_err(|e| CommentError::Internal(e.to_string()))?;

        // Every ancestor of a listed comment shares its post, so depth can
        // be resolved from the listing itself without extra queries.
        let parents: HashMap<i64, Option<i64>> = details
            .iter()
            .map(|d| (d.comment.id, d.comment.parent_id))
            .collect();

        let mut dtos = Vec::with_capacity(details.len());
        for detail in details {
            let mut depth = 0usize;
            let mut current_parent = detail.comment.parent_id;
            while let Some(parent_id) = current_parent {
                depth += 1;
                if depth > MAX_THREAD_DEPTH {
                    break;
                }
                current_parent = match parents.get(&parent_id) {
                    Some(parent) => *parent,
                    None => {
                        depth = self.thread_depth_of(&detail.comment).await?;
                        break;
                    }
                };
            }
            dtos.push(CommentDto {
                comment: detail.comment,
                author_username: detail.author_username,
                replies_count: detail.replies_count,
                thread_depth: depth,
            });
        }

        Ok(dtos)
    }

    async fn get_comment(&self, comment_id: i64) -> Result<CommentDto, CommentError> {
        let details = self
            .comment_repo
            .find_details(comment_id)
            .await
            .map_err(|e| CommentError::Internal(e.to_string()))?
            .ok_or(CommentError::NotFound)?;

        self.build_dto(details).await
    }

    async fn update_comment(
        &self,
        actor_id: i64,
        comment_id: i64,
        content: String,
    ) -> Result<CommentDto, CommentError> {
        let content = Self::validate_content(&content)?;

        let mut comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await
            .map_err(|e| CommentError::Internal(e.to_string()))?
            .ok_or(CommentError::NotFound)?;

        let actor = self.load_actor(actor_id).await?;
        if !PolicyService::allows(&actor, Action::UpdateComment { author_id: comment.author_id })
        {
            return Err(CommentError::Forbidden);
        }

        comment.content = content;
        comment.updated_at = Utc::now();

        self.comment_repo
            .update(&comment)
            .await
            .map_err(|e| CommentError::Internal(e.to_string()))?;

        let details = self
            .comment_repo
            .find_details(comment_id)
            .await
            .map_err(|e| CommentError::Internal(e.to_string()))?
            .ok_or(CommentError::NotFound)?;

        self.build_dto(details).await
    }

    async fn delete_comment(&self, actor_id: i64, comment_id: i64) -> Result<(), CommentError> {
        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await
            .map_err(|e| CommentError::Internal(e.to_string()))?
            .ok_or(CommentError::NotFound)?;

        let actor = self.load_actor(actor_id).await?;
        if !PolicyService::allows(&actor, Action::DeleteComment { author_id: comment.author_id })
        {
            return Err(CommentError::Forbidden);
        }

        self.comment_repo
            .delete(comment_id)
            .await
            .map_err(|e| CommentError::Internal(e.to_string()))
    }

    async fn report_comment(&self, actor_id: i64, comment_id: i64) -> Result<(), CommentError> {
        self.comment_repo
            .find_by_id(comment_id)
            .await
            .map_err(|e| CommentError::Internal(e.to_string()))?
            .ok_or(CommentError::NotFound)?;

        self.comment_repo
            .add_report(comment_id, actor_id)
            .await
            .map_err(|e| CommentError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        MockCommentRepository, MockPostRepository, MockRelationshipRepository,
        MockUserRepository, Post,
    };
    use mockall::predicate::eq;

    fn stub_post(id: i64, author_id: i64, visibility: Visibility) -> Post {
        let now = Utc::now();
        Post {
            id,
            author_id,
            content: "hello".to_string(),
            image_url: None,
            visibility,
            created_at: now,
            updated_at: now,
        }
    }

    fn stub_comment(id: i64, post_id: i64, parent_id: Option<i64>) -> Comment {
        let now = Utc::now();
        Comment {
            id,
            author_id: 10,
            post_id,
            parent_id,
            content: "hi".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn service(
        comment_repo: MockCommentRepository,
        post_repo: MockPostRepository,
        relationship_repo: MockRelationshipRepository,
        user_repo: MockUserRepository,
    ) -> CommentServiceImpl<
        MockCommentRepository,
        MockPostRepository,
        MockRelationshipRepository,
        MockUserRepository,
    > {
        CommentServiceImpl::new(
            Arc::new(comment_repo),
            Arc::new(post_repo),
            Arc::new(relationship_repo),
            Arc::new(user_repo),
            Arc::new(SnowflakeGenerator::new(1, 0)),
        )
    }

    fn expect_created(comment_repo: &mut MockCommentRepository) {
        comment_repo.expect_create().returning(|c| Ok(c.clone()));
        comment_repo.expect_find_details().returning(|id| {
            Ok(Some(CommentDetails {
                comment: stub_comment(id, 100, None),
                author_username: "alice".to_string(),
                replies_count: 0,
            }))
        });
    }

    #[tokio::test]
    async fn test_blank_content_fails_before_post_lookup() {
        // No expectations on the post repo: content is checked first
        let svc = service(
            MockCommentRepository::new(),
            MockPostRepository::new(),
            MockRelationshipRepository::new(),
            MockUserRepository::new(),
        );

        let result = svc
            .create_comment(
                5,
                CreateCommentDto {
                    post_id: 100,
                    parent_id: None,
                    content: "   ".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(CommentError::InvalidContent)));
    }

    #[tokio::test]
    async fn test_overlong_content_is_rejected() {
        let svc = service(
            MockCommentRepository::new(),
            MockPostRepository::new(),
            MockRelationshipRepository::new(),
            MockUserRepository::new(),
        );

        let result = svc
            .create_comment(
                5,
                CreateCommentDto {
                    post_id: 100,
                    parent_id: None,
                    content: "x".repeat(MAX_COMMENT_LENGTH + 1),
                },
            )
            .await;
        assert!(matches!(result, Err(CommentError::InvalidContent)));
    }

    #[tokio::test]
    async fn test_private_post_rejects_unfollowed_commenter() {
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_find_by_id()
            .with(eq(100))
            .returning(|id| Ok(Some(stub_post(id, 1, Visibility::Private))));

        let mut relationship_repo = MockRelationshipRepository::new();
        // The gate asks whether the post's author follows the commenter
        relationship_repo
            .expect_exists()
            .with(eq(1), eq(5))
            .returning(|_, _| Ok(false));

        let svc = service(
            MockCommentRepository::new(),
            post_repo,
            relationship_repo,
            MockUserRepository::new(),
        );

        let result = svc
            .create_comment(
                5,
                CreateCommentDto {
                    post_id: 100,
                    parent_id: None,
                    content: "hi".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(CommentError::Forbidden)));
    }

    #[tokio::test]
    async fn test_private_post_accepts_followed_commenter() {
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_find_by_id()
            .with(eq(100))
            .returning(|id| Ok(Some(stub_post(id, 1, Visibility::Private))));

        let mut relationship_repo = MockRelationshipRepository::new();
        relationship_repo
            .expect_exists()
            .with(eq(1), eq(5))
            .returning(|_, _| Ok(true));

        let mut comment_repo = MockCommentRepository::new();
        expect_created(&mut comment_repo);

        let svc = service(comment_repo, post_repo, relationship_repo, MockUserRepository::new());

        let result = svc
            .create_comment(
                5,
                CreateCommentDto {
                    post_id: 100,
                    parent_id: None,
                    content: "hi".to_string(),
                },
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_private_post_author_comments_without_edge() {
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_find_by_id()
            .with(eq(100))
            .returning(|id| Ok(Some(stub_post(id, 1, Visibility::Private))));

        let mut comment_repo = MockCommentRepository::new();
        expect_created(&mut comment_repo);

        // No relationship expectations: the author bypasses the gate
        let svc = service(
            comment_repo,
            post_repo,
            MockRelationshipRepository::new(),
            MockUserRepository::new(),
        );

        let result = svc
            .create_comment(
                1,
                CreateCommentDto {
                    post_id: 100,
                    parent_id: None,
                    content: "hi".to_string(),
                },
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_reply_to_depth_two_comment_is_allowed() {
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_find_by_id()
            .with(eq(100))
            .returning(|id| Ok(Some(stub_post(id, 1, Visibility::Public))));

        // Chain: 3 -> 2 -> 1 (root); replying to 3 creates a depth-3 comment
        let mut comment_repo = MockCommentRepository::new();
        comment_repo
            .expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(stub_comment(id, 100, Some(2)))));
        comment_repo
            .expect_find_by_id()
            .with(eq(2))
            .returning(|id| Ok(Some(stub_comment(id, 100, Some(1)))));
        comment_repo
            .expect_find_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(stub_comment(id, 100, None))));
        expect_created(&mut comment_repo);

        let svc = service(
            comment_repo,
            post_repo,
            MockRelationshipRepository::new(),
            MockUserRepository::new(),
        );

        let result = svc
            .create_comment(
                5,
                CreateCommentDto {
                    post_id: 100,
                    parent_id: Some(3),
                    content: "hi".to_string(),
                },
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_reply_to_depth_three_comment_exceeds_limit() {
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_find_by_id()
            .with(eq(100))
            .returning(|id| Ok(Some(stub_post(id, 1, Visibility::Public))));

        // Chain: 4 -> 3 -> 2 -> 1 (root); comment 4 already sits at depth 3
        let mut comment_repo = MockCommentRepository::new();
        comment_repo
            .expect_find_by_id()
            .with(eq(4))
            .returning(|id| Ok(Some(stub_comment(id, 100, Some(3)))));
        comment_repo
            .expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(stub_comment(id, 100, Some(2)))));
        comment_repo
            .expect_find_by_id()
            .with(eq(2))
            .returning(|id| Ok(Some(stub_comment(id, 100, Some(1)))));

        let svc = service(
            comment_repo,
            post_repo,
            MockRelationshipRepository::new(),
            MockUserRepository::new(),
        );

        let result = svc
            .create_comment(
                5,
                CreateCommentDto {
                    post_id: 100,
                    parent_id: Some(4),
                    content: "hi".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(CommentError::MaxDepthExceeded)));
    }

    #[tokio::test]
    async fn test_parent_from_another_post_is_rejected() {
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_find_by_id()
            .with(eq(100))
            .returning(|id| Ok(Some(stub_post(id, 1, Visibility::Public))));

        let mut comment_repo = MockCommentRepository::new();
        comment_repo
            .expect_find_by_id()
            .with(eq(9))
            .returning(|id| Ok(Some(stub_comment(id, 200, None))));

        let svc = service(
            comment_repo,
            post_repo,
            MockRelationshipRepository::new(),
            MockUserRepository::new(),
        );

        let result = svc
            .create_comment(
                5,
                CreateCommentDto {
                    post_id: 100,
                    parent_id: Some(9),
                    content: "hi".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(CommentError::InvalidParent)));
    }

    #[tokio::test]
    async fn test_comment_on_missing_post_is_not_found() {
        let mut post_repo = MockPostRepository::new();
        post_repo.expect_find_by_id().returning(|_| Ok(None));

        let svc = service(
            MockCommentRepository::new(),
            post_repo,
            MockRelationshipRepository::new(),
            MockUserRepository::new(),
        );

        let result = svc
            .create_comment(
                5,
                CreateCommentDto {
                    post_id: 999,
                    parent_id: None,
                    content: "hi".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(CommentError::PostNotFound)));
    }

    #[tokio::test]
    async fn test_list_computes_depth_from_listing() {
        let mut comment_repo = MockCommentRepository::new();
        comment_repo.expect_list_by_post().with(eq(100)).returning(|_| {
            Ok(vec![
                CommentDetails {
                    comment: stub_comment(3, 100, Some(2)),
                    author_username: "carol".to_string(),
                    replies_count: 0,
                },
                CommentDetails {
                    comment: stub_comment(2, 100, Some(1)),
                    author_username: "bob".to_string(),
                    replies_count: 1,
                },
                CommentDetails {
                    comment: stub_comment(1, 100, None),
                    author_username: "alice".to_string(),
                    replies_count: 1,
                },
            ])
        });

        let svc = service(
            comment_repo,
            MockPostRepository::new(),
            MockRelationshipRepository::new(),
            MockUserRepository::new(),
        );

        let dtos = svc.list_comments(Some(100)).await.unwrap();
        assert_eq!(dtos[0].thread_depth, 2);
        assert_eq!(dtos[1].thread_depth, 1);
        assert_eq!(dtos[2].thread_depth, 0);
        assert!(dtos[0].comment.is_reply());
        assert!(!dtos[2].comment.is_reply());
    }
}
