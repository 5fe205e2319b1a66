//! Comment Repository Implementation
//!
//! PostgreSQL implementation of the CommentRepository trait. Detail reads
//! join the author and count direct replies in the query.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Comment, CommentDetails, CommentRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i64,
    author_id: i64,
    post_id: i64,
    parent_id: Option<i64>,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            id: self.id,
            author_id: self.author_id,
            post_id: self.post_id,
            parent_id: self.parent_id,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CommentDetailsRow {
    id: i64,
    author_id: i64,
    post_id: i64,
    parent_id: Option<i64>,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_username: String,
    replies_count: i64,
}

impl CommentDetailsRow {
    fn into_details(self) -> CommentDetails {
        CommentDetails {
            comment: Comment {
                id: self.id,
                author_id: self.author_id,
                post_id: self.post_id,
                parent_id: self.parent_id,
                content: self.content,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            author_username: self.author_username,
            replies_count: self.replies_count,
        }
    }
}

const DETAILS_SELECT: &str =
    "SELECT c.id, c.author_id, c.post_id, c.parent_id, c.content, \
            c.created_at, c.updated_at, u.username AS author_username, \
            (SELECT COUNT(*) FROM comments r WHERE r.parent_id = c.id) AS replies_count \
     FROM comments c \
     JOIN users u ON u.id = c.author_id";

/// PostgreSQL comment repository implementation.
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError> {
        let row = sqlx::query_as::<_, CommentRow>(
            "SELECT id, author_id, post_id, parent_id, content, created_at, updated_at \
             FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_comment()))
    }

    async fn find_details(&self, id: i64) -> Result<Option<CommentDetails>, AppError> {
        let row =
            sqlx::query_as::<_, CommentDetailsRow>(&format!("{DETAILS_SELECT} WHERE c.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|r| r.into_details()))
    }

    async fn list_all(&self) -> Result<Vec<CommentDetails>, AppError> {
        let rows = sqlx::query_as::<_, CommentDetailsRow>(&format!(
            "{DETAILS_SELECT} ORDER BY c.created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_details()).collect())
    }

    async fn list_by_post(&self, post_id: i64) -> Result<Vec<CommentDetails>, AppError> {
        let rows = sqlx::query_as::<_, CommentDetailsRow>(&format!(
            "{DETAILS_SELECT} WHERE c.post_id = $1 ORDER BY c.created_at DESC"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_details()).collect())
    }

    async fn create(&self, comment: &Comment) -> Result<Comment, AppError> {
        let row = sqlx::query_as::<_, CommentRow>(
            "INSERT INTO comments (id, author_id, post_id, parent_id, content) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, author_id, post_id, parent_id, content, created_at, updated_at",
        )
        .bind(comment.id)
        .bind(comment.author_id)
        .bind(comment.post_id)
        .bind(comment.parent_id)
        .bind(&comment.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_comment())
    }

    async fn update(&self, comment: &Comment) -> Result<Comment, AppError> {
        let row = sqlx::query_as::<_, CommentRow>(
            "UPDATE comments SET content = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, author_id, post_id, parent_id, content, created_at, updated_at",
        )
        .bind(comment.id)
        .bind(&comment.content)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment with id {} not found", comment.id)))?;

        Ok(row.into_comment())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment with id {} not found", id)));
        }

        Ok(())
    }

    /// Reports are idempotent per (comment, reporter) pair.
    async fn add_report(&self, comment_id: i64, reporter_id: i64) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO comment_reports (comment_id, reporter_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(comment_id)
        .bind(reporter_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
