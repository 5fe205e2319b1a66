//! Verification Token Repository Implementation
//!
//! PostgreSQL implementation of the VerificationTokenRepository trait.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::VerificationTokenRepository;
use crate::shared::error::AppError;

/// PostgreSQL verification token repository implementation.
#[derive(Clone)]
pub struct PgVerificationTokenRepository {
    pool: PgPool,
}

impl PgVerificationTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationTokenRepository for PgVerificationTokenRepository {
    /// Mark the token used and activate its user in one transaction.
    ///
    /// The UPDATE's `used = FALSE` guard makes consumption single-shot:
    /// a second call with the same token matches no row and returns None.
    async fn consume(&self, token: &str) -> Result<Option<i64>, AppError> {
        let mut tx = self.pool.begin().await?;

        let user_id = sqlx::query_scalar::<_, i64>(
            "UPDATE email_verification_tokens \
             SET used = TRUE \
             WHERE token = $1 AND used = FALSE \
             RETURNING user_id",
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_id) = user_id else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("UPDATE users SET is_active = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(user_id))
    }
}
