//! Request DTOs
//!
//! Data structures for API request bodies. Field rules live on the types;
//! cross-field and domain-specific rules call into `shared::validation`.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::shared::validation::{
    validate_birth_date, validate_github_url, validate_password_strength,
};

/// Registration request
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_passwords_match"))]
pub struct RegisterRequest {
    #[validate(length(min = 4, max = 32, message = "Username must be 4-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    pub password_confirm: String,

    #[validate(length(max = 64, message = "First name must be at most 64 characters"))]
    pub first_name: String,

    #[validate(length(max = 64, message = "Last name must be at most 64 characters"))]
    pub last_name: String,

    #[validate(length(max = 300, message = "Bio must be at most 300 characters"))]
    pub bio: Option<String>,

    #[validate(custom(function = "validate_github_url"))]
    pub github_url: Option<String>,

    #[validate(custom(function = "validate_birth_date"))]
    pub birth_date: Option<NaiveDate>,

    #[validate(url(message = "Invalid avatar URL"))]
    pub avatar_url: Option<String>,
}

fn validate_passwords_match(request: &RegisterRequest) -> Result<(), ValidationError> {
    if request.password != request.password_confirm {
        return Err(ValidationError::new("password_mismatch")
            .with_message("Passwords do not match".into()));
    }
    Ok(())
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Logout request
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Email verification request
#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

/// Password change request
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,

    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
}

/// Update user request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 4, max = 32, message = "Username must be 4-32 characters"))]
    pub username: Option<String>,

    #[validate(length(max = 64, message = "First name must be at most 64 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 64, message = "Last name must be at most 64 characters"))]
    pub last_name: Option<String>,

    #[validate(url(message = "Invalid avatar URL"))]
    pub avatar_url: Option<String>,
}

/// Profile upsert request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 300, message = "Bio must be at most 300 characters"))]
    pub bio: Option<String>,

    #[validate(custom(function = "validate_github_url"))]
    pub github_url: Option<String>,

    #[validate(custom(function = "validate_birth_date"))]
    pub birth_date: Option<NaiveDate>,
}

/// Create post request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 280, message = "Content must be 1-280 characters"))]
    pub content: String,

    /// One of public, followers, private. Absent means private.
    pub visibility: Option<String>,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,
}

/// Update post request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 280, message = "Content must be 1-280 characters"))]
    pub content: Option<String>,

    pub visibility: Option<String>,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,
}

/// Post listing filters
#[derive(Debug, Deserialize, Default)]
pub struct PostListQuery {
    /// Author ID filter
    pub author: Option<String>,
}

/// Create comment request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Post the comment belongs to
    pub post: i64,

    /// Parent comment when replying
    pub parent: Option<i64>,

    #[validate(length(min = 1, max = 280, message = "Content must be 1-280 characters"))]
    pub content: String,
}

/// Update comment request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 280, message = "Content must be 1-280 characters"))]
    pub content: String,
}

/// Comment listing filters
#[derive(Debug, Deserialize, Default)]
pub struct CommentListQuery {
    /// Post ID filter; a non-numeric value yields an empty list
    pub post: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "Str0ng!pass".to_string(),
            password_confirm: "Str0ng!pass".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            bio: None,
            github_url: None,
            birth_date: None,
            avatar_url: None,
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(register_request().validate().is_ok());
    }

    #[test]
    fn test_short_username_is_rejected() {
        let mut request = register_request();
        request.username = "abc".to_string();
        assert!(request.validate().is_err());

        request.username = "abcd".to_string();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_username_update_keeps_minimum_length() {
        let request = UpdateUserRequest {
            username: Some("abc".to_string()),
            first_name: None,
            last_name: None,
            avatar_url: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_password_mismatch_is_rejected() {
        let mut request = register_request();
        request.password_confirm = "Other1!pass".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_weak_password_is_rejected() {
        let mut request = register_request();
        request.password = "alllowercase".to_string();
        request.password_confirm = request.password.clone();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_bad_email_is_rejected() {
        let mut request = register_request();
        request.email = "not-an-email".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_non_github_url_is_rejected() {
        let mut request = register_request();
        request.github_url = Some("https://gitlab.com/alice".to_string());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_underage_birth_date_is_rejected() {
        let mut request = register_request();
        request.birth_date = Some(chrono::Utc::now().date_naive());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_post_content_is_rejected() {
        let request = CreatePostRequest {
            content: String::new(),
            visibility: None,
            image_url: None,
        };
        assert!(request.validate().is_err());
    }
}
