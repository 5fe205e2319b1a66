//! Relationship Repository Implementation
//!
//! PostgreSQL implementation of the RelationshipRepository trait. The
//! composite primary key (follower_id, followee_id) backs the duplicate
//! checks.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{Relationship, RelationshipRepository};
use crate::shared::error::AppError;

/// PostgreSQL relationship repository implementation.
#[derive(Clone)]
pub struct PgRelationshipRepository {
    pool: PgPool,
}

impl PgRelationshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationshipRepository for PgRelationshipRepository {
    async fn exists(&self, follower_id: i64, followee_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM relationships \
             WHERE follower_id = $1 AND followee_id = $2)",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn create(&self, edge: &Relationship) -> Result<(), AppError> {
        sqlx::query("INSERT INTO relationships (follower_id, followee_id) VALUES ($1, $2)")
            .bind(edge.follower_id)
            .bind(edge.followee_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::Conflict("Already following this user".to_string())
                }
                _ => AppError::Database(e),
            })?;

        Ok(())
    }

    async fn delete(&self, follower_id: i64, followee_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM relationships WHERE follower_id = $1 AND followee_id = $2",
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_followers(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM relationships WHERE followee_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_following(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM relationships WHERE follower_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
