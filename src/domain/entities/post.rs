//! Post entity and repository trait.
//!
//! Maps to the `posts` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Maximum post content length in characters.
pub const MAX_POST_LENGTH: usize = 280;

/// Post visibility enum matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Followers,
    #[default]
    Private,
}

impl Visibility {
    /// Parse from a request or database string. Returns `None` for values
    /// outside the enum, so callers can reject them.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "public" => Some(Self::Public),
            "followers" => Some(Self::Followers),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    /// Convert from database string representation, defaulting to private.
    pub fn from_str(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Followers => "followers",
            Self::Private => "private",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents an author-owned post.
///
/// Maps to the `posts` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - author_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - content: VARCHAR(280) NOT NULL
/// - image_url: TEXT NULL
/// - visibility: VARCHAR(20) DEFAULT 'private'
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Owning author
    pub author_id: i64,

    /// Post text (up to 280 characters)
    pub content: String,

    /// Optional image reference
    pub image_url: Option<String>,

    /// Who may see and comment on the post
    #[serde(default)]
    pub visibility: Visibility,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A post joined with the display data its responses need, recomputed from
/// relational state on every read.
#[derive(Debug, Clone)]
pub struct PostDetails {
    pub post: Post,
    pub author_username: String,
    pub likes_count: i64,
}

/// Repository trait for Post data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a post by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError>;

    /// Find a post with author and like data.
    async fn find_details(&self, id: i64) -> Result<Option<PostDetails>, AppError>;

    /// List posts newest first, optionally scoped to one author.
    async fn list(&self, author_id: Option<i64>) -> Result<Vec<PostDetails>, AppError>;

    /// Create a new post.
    async fn create(&self, post: &Post) -> Result<Post, AppError>;

    /// Update a post's content, image, and visibility.
    async fn update(&self, post: &Post) -> Result<Post, AppError>;

    /// Delete a post by ID.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Count posts owned by an author.
    async fn count_by_author(&self, author_id: i64) -> Result<i64, AppError>;
}
