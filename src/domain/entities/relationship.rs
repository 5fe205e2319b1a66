//! Relationship (follow edge) entity and repository trait.
//!
//! Maps to the `relationships` table. Each row is a directed edge from
//! `follower_id` to `followee_id`, unique per pair.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a directed follow edge between two users.
///
/// Maps to the `relationships` table:
/// - follower_id: BIGINT NOT NULL REFERENCES users(id) (composite PK)
/// - followee_id: BIGINT NOT NULL REFERENCES users(id) (composite PK)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// The composite primary key makes the edge unique per pair, and a CHECK
/// constraint rejects self-follows at the storage level too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// User who follows
    pub follower_id: i64,

    /// User being followed
    pub followee_id: i64,

    /// When the edge was created
    pub created_at: DateTime<Utc>,
}

impl Relationship {
    /// Create a new follow edge.
    pub fn new(follower_id: i64, followee_id: i64) -> Self {
        Self {
            follower_id,
            followee_id,
            created_at: Utc::now(),
        }
    }
}

/// Repository trait for Relationship data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationshipRepository: Send + Sync {
    /// Check whether a follow edge exists.
    async fn exists(&self, follower_id: i64, followee_id: i64) -> Result<bool, AppError>;

    /// Create a follow edge. Returns `Conflict` when the edge already exists.
    async fn create(&self, edge: &Relationship) -> Result<(), AppError>;

    /// Delete a follow edge. Returns whether a row was removed.
    async fn delete(&self, follower_id: i64, followee_id: i64) -> Result<bool, AppError>;

    /// Count users following the given user.
    async fn count_followers(&self, user_id: i64) -> Result<i64, AppError>;

    /// Count users the given user follows.
    async fn count_following(&self, user_id: i64) -> Result<i64, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_edge_carries_pair() {
        let edge = Relationship::new(1, 2);

        assert_eq!(edge.follower_id, 1);
        assert_eq!(edge.followee_id, 2);
    }
}
