//! Profile Repository Implementation
//!
//! PostgreSQL implementation of the ProfileRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Profile, ProfileRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    user_id: i64,
    bio: Option<String>,
    github_url: Option<String>,
    birth_date: Option<chrono::NaiveDate>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_profile(self) -> Profile {
        Profile {
            user_id: self.user_id,
            bio: self.bio,
            github_url: self.github_url,
            birth_date: self.birth_date,
            updated_at: self.updated_at,
        }
    }
}

/// PostgreSQL profile repository implementation.
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<Profile>, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT user_id, bio, github_url, birth_date, updated_at \
             FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_profile()))
    }

    async fn upsert(&self, profile: &Profile) -> Result<Profile, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "INSERT INTO profiles (user_id, bio, github_url, birth_date, updated_at) \
             VALUES ($1, $2, $3, $4, NOW()) \
             ON CONFLICT (user_id) DO UPDATE \
             SET bio = EXCLUDED.bio, \
                 github_url = EXCLUDED.github_url, \
                 birth_date = EXCLUDED.birth_date, \
                 updated_at = NOW() \
             RETURNING user_id, bio, github_url, birth_date, updated_at",
        )
        .bind(profile.user_id)
        .bind(&profile.bio)
        .bind(&profile.github_url)
        .bind(profile.birth_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_profile())
    }
}
