//! Authentication Service
//!
//! Handles registration, credential checks, JWT token management, email
//! verification, and password changes.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::JwtSettings;
use crate::domain::{
    Action, Actor, EmailVerificationToken, PolicyService, Profile, Session, SessionRepository,
    User, UserRepository, UserRole, VerificationTokenRepository,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new (inactive) user with profile and verification token
    async fn register(
        &self,
        request: RegisterUserDto,
    ) -> Result<(User, EmailVerificationToken), AuthError>;

    /// Authenticate user with credentials
    async fn authenticate(&self, username: &str, password: &str) -> Result<AuthTokens, AuthError>;

    /// Refresh access token using refresh token
    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, AuthError>;

    /// Revoke refresh token (logout)
    async fn revoke_token(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// Consume an email verification token, activating its user
    async fn verify_email(&self, token: &str) -> Result<(), AuthError>;

    /// Change a user's password after verifying the old one
    async fn change_password(
        &self,
        actor_id: i64,
        target_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
}

/// Registration data, validated at the request boundary
#[derive(Debug, Clone)]
pub struct RegisterUserDto {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub github_url: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub avatar_url: Option<String>,
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account disabled")]
    AccountDisabled,

    #[error("Permission denied")]
    Forbidden,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailExists,

    #[error("Username already exists")]
    UsernameExists,

    #[error("Session not found or expired")]
    SessionNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// AuthService implementation
pub struct AuthServiceImpl<U, S, V>
where
    U: UserRepository,
    S: SessionRepository,
    V: VerificationTokenRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    verification_repo: Arc<V>,
    id_generator: Arc<SnowflakeGenerator>,
    jwt_settings: JwtSettings,
}

impl<U, S, V> AuthServiceImpl<U, S, V>
where
    U: UserRepository,
    S: SessionRepository,
    V: VerificationTokenRepository,
{
    /// Create a new AuthServiceImpl
    pub fn new(
        user_repo: Arc<U>,
        session_repo: Arc<S>,
        verification_repo: Arc<V>,
        id_generator: Arc<SnowflakeGenerator>,
        jwt_settings: JwtSettings,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            verification_repo,
            id_generator,
            jwt_settings,
        }
    }

    /// Hash a password using Argon2id
    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against its hash
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate access and refresh tokens
    fn generate_tokens(&self, user_id: i64) -> Result<AuthTokens, AuthError> {
        let now = Utc::now();
        let access_expiry = now + Duration::minutes(self.jwt_settings.access_token_expiry_minutes);

        let access_claims = Claims {
            sub: user_id.to_string(),
            exp: access_expiry.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &access_claims,
            &EncodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))?;

        // Opaque refresh token: no user data, only random material
        let refresh_token = format!(
            "{}.{}",
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4()
        );

        Ok(AuthTokens {
            access_token,
            refresh_token,
            expires_in: self.jwt_settings.access_token_expiry_minutes * 60,
            token_type: "Bearer".to_string(),
        })
    }

    /// Hash refresh token for storage
    fn hash_refresh_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Open a session recording the refresh token hash
    async fn create_session(&self, user_id: i64, tokens: &AuthTokens) -> Result<(), AuthError> {
        let token_hash = self.hash_refresh_token(&tokens.refresh_token);
        let session = Session::new(
            self.id_generator.generate(),
            user_id,
            token_hash,
            Utc::now() + Duration::days(self.jwt_settings.refresh_token_expiry_days),
        );

        self.session_repo
            .create(&session)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}

#[async_trait]
impl<U, S, V> AuthService for AuthServiceImpl<U, S, V>
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
    V: VerificationTokenRepository + 'static,
{
    async fn register(
        &self,
        request: RegisterUserDto,
    ) -> Result<(User, EmailVerificationToken), AuthError> {
        if self
            .user_repo
            .email_exists(&request.email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
        {
            return Err(AuthError::EmailExists);
        }

        if self
            .user_repo
            .username_exists(&request.username)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
        {
            return Err(AuthError::UsernameExists);
        }

        let password_hash = self.hash_password(&request.password)?;
        let user_id = self.id_generator.generate();

        let now = Utc::now();
        let user = User {
            id: user_id,
            username: request.username,
            email: request.email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            role: UserRole::User,
            avatar_url: request.avatar_url,
            // Accounts stay disabled until email verification
            is_active: false,
            created_at: now,
            updated_at: now,
        };

        let profile = Profile {
            user_id,
            bio: request.bio,
            github_url: request.github_url,
            birth_date: request.birth_date,
            updated_at: now,
        };

        let token = EmailVerificationToken::issue(user_id);

        let created_user = self
            .user_repo
            .create_account(&user, &profile, &token)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok((created_user, token))
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<AuthTokens, AuthError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        let tokens = self.generate_tokens(user.id)?;
        self.create_session(user.id, &tokens).await?;

        Ok(tokens)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        let token_hash = self.hash_refresh_token(refresh_token);

        let session = self
            .session_repo
            .find_by_token_hash(&token_hash)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::SessionNotFound)?;

        if !session.is_active() {
            return Err(AuthError::TokenExpired);
        }

        // Rotate the refresh token on every use
        let new_tokens = self.generate_tokens(session.user_id)?;
        let new_token_hash = self.hash_refresh_token(&new_tokens.refresh_token);
        let new_expires_at = Utc::now() + Duration::days(self.jwt_settings.refresh_token_expiry_days);

        self.session_repo
            .update_token_hash(session.id, &new_token_hash, new_expires_at)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(new_tokens)
    }

    async fn revoke_token(&self, refresh_token: &str) -> Result<(), AuthError> {
        let token_hash = self.hash_refresh_token(refresh_token);

        let session = self
            .session_repo
            .find_by_token_hash(&token_hash)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::SessionNotFound)?;

        self.session_repo
            .revoke(session.id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(())
    }

    async fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        // consume() marks the token used and activates the user in one
        // transaction; None covers both unknown and already-used tokens.
        let user_id = self
            .verification_repo
            .consume(token)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidToken)?;

        tracing::info!(user_id = %user_id, "Email verified, account activated");
        Ok(())
    }

    async fn change_password(
        &self,
        actor_id: i64,
        target_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let actor = self
            .user_repo
            .find_by_id(actor_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::UserNotFound)?;

        if !PolicyService::allows(
            &Actor::new(actor.id, actor.role),
            Action::ChangePassword { target_id },
        ) {
            return Err(AuthError::Forbidden);
        }

        // The policy is owner-only, so the actor is the target from here on.
        if !self.verify_password(old_password, &actor.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let new_hash = self.hash_password(new_password)?;
        self.user_repo
            .update_password(target_id, &new_hash)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        MockSessionRepository, MockUserRepository, MockVerificationTokenRepository,
    };
    use mockall::predicate::eq;

    fn jwt_settings() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-that-is-long-enough-0123456789".to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        }
    }

    fn service(
        user_repo: MockUserRepository,
        session_repo: MockSessionRepository,
        verification_repo: MockVerificationTokenRepository,
    ) -> AuthServiceImpl<MockUserRepository, MockSessionRepository, MockVerificationTokenRepository>
    {
        AuthServiceImpl::new(
            Arc::new(user_repo),
            Arc::new(session_repo),
            Arc::new(verification_repo),
            Arc::new(SnowflakeGenerator::new(1, 0)),
            jwt_settings(),
        )
    }

    fn register_request() -> RegisterUserDto {
        RegisterUserDto {
            username: "newuser".to_string(),
            email: "new@example.com".to_string(),
            password: "Sup3r-Secret".to_string(),
            first_name: "New".to_string(),
            last_name: "User".to_string(),
            bio: None,
            github_url: None,
            birth_date: None,
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_email_exists()
            .with(eq("new@example.com"))
            .returning(|_| Ok(true));

        let svc = service(
            user_repo,
            MockSessionRepository::new(),
            MockVerificationTokenRepository::new(),
        );

        let result = svc.register(register_request()).await;
        assert!(matches!(result, Err(AuthError::EmailExists)));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_email_exists().returning(|_| Ok(false));
        user_repo
            .expect_username_exists()
            .with(eq("newuser"))
            .returning(|_| Ok(true));

        let svc = service(
            user_repo,
            MockSessionRepository::new(),
            MockVerificationTokenRepository::new(),
        );

        let result = svc.register(register_request()).await;
        assert!(matches!(result, Err(AuthError::UsernameExists)));
    }

    #[tokio::test]
    async fn test_register_creates_inactive_user_with_token() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_email_exists().returning(|_| Ok(false));
        user_repo.expect_username_exists().returning(|_| Ok(false));
        user_repo
            .expect_create_account()
            .withf(|user, _profile, token| {
                !user.is_active && token.user_id == user.id && !token.used
            })
            .returning(|user, _, _| Ok(user.clone()));

        let svc = service(
            user_repo,
            MockSessionRepository::new(),
            MockVerificationTokenRepository::new(),
        );

        let (user, token) = svc.register(register_request()).await.unwrap();
        assert!(!user.is_active);
        assert_eq!(token.user_id, user.id);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user_is_invalid_credentials() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_username()
            .returning(|_| Ok(None));

        let svc = service(
            user_repo,
            MockSessionRepository::new(),
            MockVerificationTokenRepository::new(),
        );

        let result = svc.authenticate("ghost", "Sup3r-Secret").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_inactive_account_is_disabled() {
        // Real hash so password verification passes and the active check runs
        let svc_for_hash = service(
            MockUserRepository::new(),
            MockSessionRepository::new(),
            MockVerificationTokenRepository::new(),
        );
        let hash = svc_for_hash.hash_password("Sup3r-Secret").unwrap();

        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_username().returning(move |_| {
            let mut user = User::default();
            user.id = 42;
            user.username = "pending".to_string();
            user.password_hash = hash.clone();
            user.is_active = false;
            Ok(Some(user))
        });

        let svc = service(
            user_repo,
            MockSessionRepository::new(),
            MockVerificationTokenRepository::new(),
        );

        let result = svc.authenticate("pending", "Sup3r-Secret").await;
        assert!(matches!(result, Err(AuthError::AccountDisabled)));
    }

    #[tokio::test]
    async fn test_authenticate_active_account_issues_tokens() {
        let svc_for_hash = service(
            MockUserRepository::new(),
            MockSessionRepository::new(),
            MockVerificationTokenRepository::new(),
        );
        let hash = svc_for_hash.hash_password("Sup3r-Secret").unwrap();

        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_username().returning(move |_| {
            let mut user = User::default();
            user.id = 42;
            user.username = "active".to_string();
            user.password_hash = hash.clone();
            user.is_active = true;
            Ok(Some(user))
        });

        let mut session_repo = MockSessionRepository::new();
        session_repo
            .expect_create()
            .withf(|session| session.user_id == 42 && session.is_active())
            .returning(|_| Ok(()));

        let svc = service(user_repo, session_repo, MockVerificationTokenRepository::new());

        let tokens = svc.authenticate("active", "Sup3r-Secret").await.unwrap();
        assert_eq!(tokens.token_type, "Bearer");
        assert!(!tokens.access_token.is_empty());
        assert!(!tokens.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_verify_email_unknown_token_fails() {
        let mut verification_repo = MockVerificationTokenRepository::new();
        verification_repo
            .expect_consume()
            .with(eq("bogus"))
            .returning(|_| Ok(None));

        let svc = service(
            MockUserRepository::new(),
            MockSessionRepository::new(),
            verification_repo,
        );

        let result = svc.verify_email("bogus").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_change_password_requires_correct_old_password() {
        let svc_for_hash = service(
            MockUserRepository::new(),
            MockSessionRepository::new(),
            MockVerificationTokenRepository::new(),
        );
        let hash = svc_for_hash.hash_password("Old-Secret1").unwrap();

        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().with(eq(42)).returning(move |_| {
            let mut user = User::default();
            user.id = 42;
            user.password_hash = hash.clone();
            Ok(Some(user))
        });

        let svc = service(
            user_repo,
            MockSessionRepository::new(),
            MockVerificationTokenRepository::new(),
        );

        let result = svc
            .change_password(42, 42, "Wrong-Secret1", "New-Secret1")
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_change_password_for_another_user_is_forbidden() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().with(eq(7)).returning(|_| {
            let mut user = User::default();
            user.id = 7;
            Ok(Some(user))
        });
        // update_password must never run for a cross-user attempt
        user_repo.expect_update_password().times(0);

        let svc = service(
            user_repo,
            MockSessionRepository::new(),
            MockVerificationTokenRepository::new(),
        );

        let result = svc
            .change_password(7, 42, "Old-Secret1", "New-Secret1")
            .await;
        assert!(matches!(result, Err(AuthError::Forbidden)));
    }
}
