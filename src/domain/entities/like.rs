//! Like entity and repository trait.
//!
//! Maps to the `likes` table. The composite primary key (user_id, post_id)
//! guarantees a user likes a given post at most once; the toggle operation
//! leans on that constraint to stay safe under racing duplicate calls.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a like on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    /// User who liked the post
    pub user_id: i64,

    /// Post being liked
    pub post_id: i64,

    /// When the like was added
    pub created_at: DateTime<Utc>,
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Liked,
    Unliked,
}

impl LikeToggle {
    /// Wire representation used in responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Liked => "liked",
            Self::Unliked => "unliked",
        }
    }
}

/// Repository trait for Like data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Toggle a like in a single transaction.
    ///
    /// When no like exists the row is inserted with ON CONFLICT DO NOTHING,
    /// so a racing duplicate insert is observed through the constraint and
    /// collapses to one row instead of failing; when a like already exists
    /// it is deleted.
    async fn toggle(&self, user_id: i64, post_id: i64) -> Result<LikeToggle, AppError>;

    /// Check whether a user has liked a post.
    async fn exists(&self, user_id: i64, post_id: i64) -> Result<bool, AppError>;

    /// Count likes on a post.
    async fn count_for_post(&self, post_id: i64) -> Result<i64, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_wire_values() {
        assert_eq!(LikeToggle::Liked.as_str(), "liked");
        assert_eq!(LikeToggle::Unliked.as_str(), "unliked");
    }
}
