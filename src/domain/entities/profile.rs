//! Profile entity and repository trait.
//!
//! One-to-one extension of the user account, mapped to the `profiles` table.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Maximum bio length in characters.
pub const MAX_BIO_LENGTH: usize = 300;

/// Represents a user's profile.
///
/// Maps to the `profiles` table:
/// - user_id: BIGINT PRIMARY KEY REFERENCES users(id)
/// - bio: VARCHAR(300) NULL
/// - github_url: TEXT NULL
/// - birth_date: DATE NULL
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Owning user ID (primary key)
    pub user_id: i64,

    /// Short bio text
    pub bio: Option<String>,

    /// External GitHub link
    pub github_url: Option<String>,

    /// Birth date (registration enforces age >= 16)
    pub birth_date: Option<NaiveDate>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create an empty profile for a new user.
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            bio: None,
            github_url: None,
            birth_date: None,
            updated_at: Utc::now(),
        }
    }
}

/// Repository trait for Profile data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find the profile belonging to a user.
    async fn find_by_user(&self, user_id: i64) -> Result<Option<Profile>, AppError>;

    /// Insert or replace a user's profile fields.
    async fn upsert(&self, profile: &Profile) -> Result<Profile, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_has_no_fields() {
        let profile = Profile::empty(42);

        assert_eq!(profile.user_id, 42);
        assert!(profile.bio.is_none());
        assert!(profile.github_url.is_none());
        assert!(profile.birth_date.is_none());
    }
}
