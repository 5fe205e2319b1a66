//! Response DTOs
//!
//! Data structures for API response bodies. IDs go out as strings so
//! Snowflake values survive JSON number precision limits.

use serde::Serialize;

use crate::application::services::{AuthTokens, CommentDto, UserDto};
use crate::domain::{PostDetails, Profile, User};

/// Authentication tokens response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<AuthTokens> for TokenResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        }
    }
}

/// Registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub message: String,
}

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts_count: Option<i64>,
}

impl UserResponse {
    /// Summary projection without derived counts.
    pub fn from_user(user: User, include_email: bool) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            email: if include_email { Some(user.email) } else { None },
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role.as_str().to_string(),
            avatar_url: user.avatar_url,
            is_active: user.is_active,
            created_at: user.created_at.to_rfc3339(),
            followers_count: None,
            following_count: None,
            posts_count: None,
        }
    }

    /// Full projection with follower and post counts.
    pub fn from_dto(dto: UserDto, include_email: bool) -> Self {
        let mut response = Self::from_user(dto.user, include_email);
        response.followers_count = Some(dto.followers_count);
        response.following_count = Some(dto.following_count);
        response.posts_count = Some(dto.posts_count);
        response
    }
}

/// Profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub bio: Option<String>,
    pub github_url: Option<String>,
    pub birth_date: Option<String>,
    pub updated_at: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            bio: profile.bio,
            github_url: profile.github_url,
            birth_date: profile.birth_date.map(|d| d.to_string()),
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}

/// Post response
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub author: String,
    pub author_username: String,
    pub content: String,
    pub image_url: Option<String>,
    pub visibility: String,
    pub likes_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PostDetails> for PostResponse {
    fn from(details: PostDetails) -> Self {
        Self {
            id: details.post.id.to_string(),
            author: details.post.author_id.to_string(),
            author_username: details.author_username,
            content: details.post.content,
            image_url: details.post.image_url,
            visibility: details.post.visibility.as_str().to_string(),
            likes_count: details.likes_count,
            created_at: details.post.created_at.to_rfc3339(),
            updated_at: details.post.updated_at.to_rfc3339(),
        }
    }
}

/// Like toggle response
#[derive(Debug, Serialize)]
pub struct LikeToggleResponse {
    pub status: String,
    pub likes_count: i64,
}

/// Comment response
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub author: String,
    pub author_username: String,
    pub post: String,
    pub parent: Option<String>,
    pub content: String,
    pub is_reply: bool,
    pub thread_depth: usize,
    pub replies_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CommentDto> for CommentResponse {
    fn from(dto: CommentDto) -> Self {
        Self {
            id: dto.comment.id.to_string(),
            author: dto.comment.author_id.to_string(),
            author_username: dto.author_username,
            post: dto.comment.post_id.to_string(),
            parent: dto.comment.parent_id.map(|id| id.to_string()),
            is_reply: dto.comment.is_reply(),
            content: dto.comment.content,
            thread_depth: dto.thread_depth,
            replies_count: dto.replies_count,
            created_at: dto.comment.created_at.to_rfc3339(),
            updated_at: dto.comment.updated_at.to_rfc3339(),
        }
    }
}

/// Generic message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Generic status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_user() -> User {
        User {
            id: 42,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            ..User::default()
        }
    }

    #[test]
    fn test_summary_projection_omits_email_and_counts() {
        let response = UserResponse::from_user(sample_user(), false);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["id"], "42");
        assert_eq!(json["username"], "alice");
        assert!(json.get("email").is_none());
        assert!(json.get("followers_count").is_none());
    }

    #[test]
    fn test_full_projection_carries_email_and_counts() {
        let dto = UserDto {
            user: sample_user(),
            followers_count: 3,
            following_count: 1,
            posts_count: 7,
        };

        let response = UserResponse::from_dto(dto, true);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["followers_count"], 3);
        assert_eq!(json["following_count"], 1);
        assert_eq!(json["posts_count"], 7);
    }
}
