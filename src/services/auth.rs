//! Authentication service
//!
//! Implements business logic for chef accounts and sessions:
//! - Registration with duplicate-username/email rejection
//! - Login against argon2 password hashes
//! - Logout (session revocation)
//! - Session validation for the auth middleware
//!
//! Login failure is deliberately uniform: an unknown username and a wrong
//! password produce the same error, so callers cannot probe which
//! usernames exist.

use crate::db::repositories::ChefRepository;
use crate::models::{Chef, Session};
use crate::services::password::{hash_password, verify_password};
use crate::services::session::SessionAuthority;
use anyhow::Context;
use std::sync::Arc;

/// Error types for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Chef already exists
    #[error("Chef already exists: {0}")]
    ChefExists(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Authentication service for chef accounts
pub struct AuthService {
    chef_repo: Arc<dyn ChefRepository>,
    sessions: Arc<SessionAuthority>,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(chef_repo: Arc<dyn ChefRepository>, sessions: Arc<SessionAuthority>) -> Self {
        Self {
            chef_repo,
            sessions,
        }
    }

    /// Register a new chef
    ///
    /// # Arguments
    ///
    /// * `input` - Registration input containing username, email, and password
    ///
    /// # Returns
    ///
    /// The created chef on success
    ///
    /// # Errors
    ///
    /// - `ValidationError` if username, email, or password is empty or malformed
    /// - `ChefExists` if the username or email is already taken
    /// - `InternalError` for database errors
    pub async fn register(&self, input: RegisterInput) -> Result<Chef, AuthServiceError> {
        self.validate_register_input(&input)?;

        if self
            .chef_repo
            .get_by_username(&input.username)
            .await
            .context("Failed to check username")?
            .is_some()
        {
            return Err(AuthServiceError::ChefExists(
                "Username already exists".to_string(),
            ));
        }

        if self
            .chef_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(AuthServiceError::ChefExists(
                "Email already registered".to_string(),
            ));
        }

        let password_hash =
            hash_password(&input.password).context("Failed to hash password")?;

        let chef = Chef::new(input.username, input.email, password_hash);

        let created = self
            .chef_repo
            .create(&chef)
            .await
            .context("Failed to create chef")?;

        Ok(created)
    }

    /// Login with username and password
    ///
    /// Verifies the credentials and issues a new session token.
    ///
    /// # Returns
    ///
    /// The authenticated chef and their new session
    ///
    /// # Errors
    ///
    /// - `AuthenticationError` with the same message whether the username is
    ///   unknown or the password is wrong
    /// - `InternalError` for database or entropy failures
    pub async fn login(&self, input: LoginInput) -> Result<(Chef, Session), AuthServiceError> {
        let chef = self
            .chef_repo
            .get_by_username(&input.username)
            .await
            .context("Failed to get chef by username")?
            .ok_or_else(|| {
                AuthServiceError::AuthenticationError(
                    "Invalid username or password".to_string(),
                )
            })?;

        let password_valid = verify_password(&input.password, &chef.password_hash)
            .context("Failed to verify password")?;

        if !password_valid {
            return Err(AuthServiceError::AuthenticationError(
                "Invalid username or password".to_string(),
            ));
        }

        let session = self
            .sessions
            .issue(chef.id)
            .await
            .context("Failed to issue session")?;

        Ok((chef, session))
    }

    /// Logout (revoke a session token)
    ///
    /// Returns `true` if a live session was revoked, `false` if the token
    /// was unknown or already expired.
    pub async fn logout(&self, token: &str) -> bool {
        // resolve() evicts expired sessions, so a stale token reports false
        if self.sessions.resolve(token).await.is_none() {
            return false;
        }
        self.sessions.revoke(token).await
    }

    /// Validate a session token and return the associated chef
    ///
    /// Returns `None` if the token is unknown, expired, or belongs to a chef
    /// that no longer exists.
    ///
    /// # Errors
    ///
    /// - `InternalError` for database errors
    pub async fn validate_session(&self, token: &str) -> Result<Option<Chef>, AuthServiceError> {
        let chef_id = match self.sessions.resolve(token).await {
            Some(id) => id,
            None => return Ok(None),
        };

        let chef = self
            .chef_repo
            .get_by_id(chef_id)
            .await
            .context("Failed to get chef for session")?;

        // A session outliving its chef is no longer valid
        if chef.is_none() {
            self.sessions.revoke(token).await;
        }

        Ok(chef)
    }

    /// Validate registration input
    fn validate_register_input(&self, input: &RegisterInput) -> Result<(), AuthServiceError> {
        if input.username.trim().is_empty() {
            return Err(AuthServiceError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }

        if input.email.trim().is_empty() {
            return Err(AuthServiceError::ValidationError(
                "Email cannot be empty".to_string(),
            ));
        }

        if input.password.is_empty() {
            return Err(AuthServiceError::ValidationError(
                "Password cannot be empty".to_string(),
            ));
        }

        // Basic email format validation
        if !input.email.contains('@') {
            return Err(AuthServiceError::ValidationError(
                "Invalid email format".to_string(),
            ));
        }

        Ok(())
    }
}

/// Input for chef registration
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    /// Create a new registration input
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Input for chef login
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginInput {
    /// Create a new login input
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
