//! User session entity and repository trait.
//!
//! Maps to the `sessions` table. Used for refresh token management; only
//! the SHA-256 hash of the refresh token is ever stored.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a refresh token session.
///
/// Maps to the `sessions` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - user_id: BIGINT NOT NULL REFERENCES users(id)
/// - token_hash: VARCHAR(64) NOT NULL UNIQUE (SHA-256 hash)
/// - expires_at: TIMESTAMPTZ NOT NULL
/// - revoked_at: TIMESTAMPTZ NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// User this session belongs to
    pub user_id: i64,

    /// SHA-256 hash of the refresh token (never store raw tokens)
    #[serde(skip_serializing)]
    pub token_hash: String,

    /// When this session expires
    pub expires_at: DateTime<Utc>,

    /// When the session was revoked (None if active)
    pub revoked_at: Option<DateTime<Utc>>,

    /// When the session was created
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session.
    pub fn new(id: i64, user_id: i64, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            token_hash,
            expires_at,
            revoked_at: None,
            created_at: Utc::now(),
        }
    }

    /// Check if the session is currently active (not expired, not revoked).
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none() && self.expires_at > Utc::now()
    }
}

/// Repository trait for Session data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session.
    async fn create(&self, session: &Session) -> Result<(), AppError>;

    /// Find a session by the hash of its refresh token.
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AppError>;

    /// Rotate the session's refresh token hash and expiry.
    async fn update_token_hash(
        &self,
        id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Revoke a session (logout).
    async fn revoke(&self, id: i64) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_fresh_session_is_active() {
        let session = Session::new(1, 2, "hash".into(), Utc::now() + Duration::days(7));
        assert!(session.is_active());
    }

    #[test]
    fn test_expired_session_is_inactive() {
        let session = Session::new(1, 2, "hash".into(), Utc::now() - Duration::minutes(1));
        assert!(!session.is_active());
    }

    #[test]
    fn test_revoked_session_is_inactive() {
        let mut session = Session::new(1, 2, "hash".into(), Utc::now() + Duration::days(7));
        session.revoked_at = Some(Utc::now());

        assert!(!session.is_active());
    }

    #[test]
    fn test_token_hash_not_serialized() {
        let session = Session::new(1, 2, "secret-hash".into(), Utc::now() + Duration::days(7));
        let serialized = serde_json::to_string(&session).expect("Failed to serialize session");

        assert!(!serialized.contains("secret-hash"));
    }
}
