//! Like Repository Implementation
//!
//! PostgreSQL implementation of the LikeRepository trait.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{LikeRepository, LikeToggle};
use crate::shared::error::AppError;

/// PostgreSQL like repository implementation.
#[derive(Clone)]
pub struct PgLikeRepository {
    pool: PgPool,
}

impl PgLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    /// Toggle inside one transaction. The insert path uses ON CONFLICT DO
    /// NOTHING so two racing "like" calls both land on the insert branch
    /// and the table still ends up with exactly one row.
    async fn toggle(&self, user_id: i64, post_id: i64) -> Result<LikeToggle, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = $1 AND post_id = $2)",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&mut *tx)
        .await?;

        let toggle = if existing {
            sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
                .bind(user_id)
                .bind(post_id)
                .execute(&mut *tx)
                .await?;
            LikeToggle::Unliked
        } else {
            sqlx::query(
                "INSERT INTO likes (user_id, post_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
            LikeToggle::Liked
        };

        tx.commit().await?;

        Ok(toggle)
    }

    async fn exists(&self, user_id: i64, post_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = $1 AND post_id = $2)",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn count_for_post(&self, post_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
