//! Email verification token entity and repository trait.
//!
//! Maps to the `email_verification_tokens` table. Tokens are opaque,
//! single-use, and tied to one user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a single-use email verification token.
///
/// Maps to the `email_verification_tokens` table:
/// - token: VARCHAR(64) PRIMARY KEY
/// - user_id: BIGINT NOT NULL REFERENCES users(id)
/// - used: BOOLEAN NOT NULL DEFAULT FALSE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailVerificationToken {
    /// Opaque token value (64 hex characters)
    pub token: String,

    /// User the token verifies
    pub user_id: i64,

    /// Whether the token was already consumed
    pub used: bool,

    /// When the token was issued
    pub created_at: DateTime<Utc>,
}

impl EmailVerificationToken {
    /// Issue a fresh unused token for a user.
    pub fn issue(user_id: i64) -> Self {
        let token = format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        );
        Self {
            token,
            user_id,
            used: false,
            created_at: Utc::now(),
        }
    }
}

/// Repository trait for verification token operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationTokenRepository: Send + Sync {
    /// Consume a token: atomically mark it used and activate its user.
    ///
    /// Returns the verified user's ID, or `None` when the token does not
    /// exist or was already used.
    async fn consume(&self, token: &str) -> Result<Option<i64>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_produces_64_char_token() {
        let token = EmailVerificationToken::issue(7);

        assert_eq!(token.token.len(), 64);
        assert_eq!(token.user_id, 7);
        assert!(!token.used);
    }

    #[test]
    fn test_issued_tokens_are_unique() {
        let a = EmailVerificationToken::issue(7);
        let b = EmailVerificationToken::issue(7);

        assert_ne!(a.token, b.token);
    }
}
