//! Comment entity and repository trait.
//!
//! Maps to the `comments` table. Comments attach to a post and optionally
//! nest under a parent comment; the parent is stored as an optional key
//! reference (an arena keyed by ID), never as an in-memory link, so the
//! tree has no ownership cycles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Maximum comment content length in characters.
pub const MAX_COMMENT_LENGTH: usize = 280;

/// Maximum nesting depth from a root comment.
pub const MAX_THREAD_DEPTH: usize = 3;

/// Represents a comment on a post, optionally nested under a parent.
///
/// Maps to the `comments` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - author_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - post_id: BIGINT NOT NULL REFERENCES posts(id) ON DELETE CASCADE
/// - parent_id: BIGINT NULL REFERENCES comments(id) ON DELETE CASCADE
/// - content: VARCHAR(280) NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Comment author
    pub author_id: i64,

    /// Post the comment belongs to
    pub post_id: i64,

    /// Parent comment when this is a reply
    pub parent_id: Option<i64>,

    /// Comment text (up to 280 characters)
    pub content: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp (bumped on content edits)
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Whether this comment is a reply to another comment.
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// A comment joined with the display data its responses need, recomputed
/// from relational state on every read.
#[derive(Debug, Clone)]
pub struct CommentDetails {
    pub comment: Comment,
    pub author_username: String,
    pub replies_count: i64,
}

/// Repository trait for Comment data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find a comment by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError>;

    /// Find a comment with author and reply data.
    async fn find_details(&self, id: i64) -> Result<Option<CommentDetails>, AppError>;

    /// List all comments, newest first.
    async fn list_all(&self) -> Result<Vec<CommentDetails>, AppError>;

    /// List the comments on one post, newest first.
    async fn list_by_post(&self, post_id: i64) -> Result<Vec<CommentDetails>, AppError>;

    /// Create a new comment.
    async fn create(&self, comment: &Comment) -> Result<Comment, AppError>;

    /// Update a comment's content, bumping updated_at.
    async fn update(&self, comment: &Comment) -> Result<Comment, AppError>;

    /// Delete a comment by ID (cascades to replies).
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Record a report marker against a comment.
    async fn add_report(&self, comment_id: i64, reporter_id: i64) -> Result<(), AppError>;
}
