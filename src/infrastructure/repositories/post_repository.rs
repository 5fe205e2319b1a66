//! Post Repository Implementation
//!
//! PostgreSQL implementation of the PostRepository trait. Detail reads
//! join the author and count likes in the query so responses always
//! reflect current relational state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Post, PostDetails, PostRepository, Visibility};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    author_id: i64,
    content: String,
    image_url: Option<String>,
    visibility: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            id: self.id,
            author_id: self.author_id,
            content: self.content,
            image_url: self.image_url,
            visibility: Visibility::from_str(&self.visibility),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PostDetailsRow {
    id: i64,
    author_id: i64,
    content: String,
    image_url: Option<String>,
    visibility: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_username: String,
    likes_count: i64,
}

impl PostDetailsRow {
    fn into_details(self) -> PostDetails {
        PostDetails {
            post: Post {
                id: self.id,
                author_id: self.author_id,
                content: self.content,
                image_url: self.image_url,
                visibility: Visibility::from_str(&self.visibility),
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            author_username: self.author_username,
            likes_count: self.likes_count,
        }
    }
}

const DETAILS_SELECT: &str = "SELECT p.id, p.author_id, p.content, p.image_url, p.visibility, \
            p.created_at, p.updated_at, u.username AS author_username, \
            (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes_count \
     FROM posts p \
     JOIN users u ON u.id = p.author_id";

/// PostgreSQL post repository implementation.
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, author_id, content, image_url, visibility, created_at, updated_at \
             FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_post()))
    }

    async fn find_details(&self, id: i64) -> Result<Option<PostDetails>, AppError> {
        let row =
            sqlx::query_as::<_, PostDetailsRow>(&format!("{DETAILS_SELECT} WHERE p.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|r| r.into_details()))
    }

    async fn list(&self, author_id: Option<i64>) -> Result<Vec<PostDetails>, AppError> {
        let rows = match author_id {
            Some(author_id) => {
                sqlx::query_as::<_, PostDetailsRow>(&format!(
                    "{DETAILS_SELECT} WHERE p.author_id = $1 ORDER BY p.created_at DESC"
                ))
                .bind(author_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, PostDetailsRow>(&format!(
                    "{DETAILS_SELECT} ORDER BY p.created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(|r| r.into_details()).collect())
    }

    async fn create(&self, post: &Post) -> Result<Post, AppError> {
        let row = sqlx::query_as::<_, PostRow>(
            "INSERT INTO posts (id, author_id, content, image_url, visibility) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, author_id, content, image_url, visibility, created_at, updated_at",
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(post.visibility.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_post())
    }

    async fn update(&self, post: &Post) -> Result<Post, AppError> {
        let row = sqlx::query_as::<_, PostRow>(
            "UPDATE posts \
             SET content = $2, image_url = $3, visibility = $4, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, author_id, content, image_url, visibility, created_at, updated_at",
        )
        .bind(post.id)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(post.visibility.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", post.id)))?;

        Ok(row.into_post())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post with id {} not found", id)));
        }

        Ok(())
    }

    async fn count_by_author(&self, author_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
