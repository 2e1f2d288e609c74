//! Domain service for authentication and account management.
//!
//! Handles registration, login, password changes, and API key management.

use serde::Serialize;
use thiserror::Error;

use crate::db::Profile;
use crate::models::Role;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Profile not found")]
    ProfileNotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Login result containing the profile and its API key.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub api_key: String,
}

impl From<Profile> for LoginResult {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            email: p.email,
            full_name: p.full_name,
            role: p.role,
            api_key: p.api_key,
        }
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Registers a new account. The role is always `lecturer`; promoting an
    /// account is a separate privileged operation.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] when the email is already in use.
    async fn register(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> Result<LoginResult, AuthError>;

    /// Verifies credentials and returns the profile.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Verifies an API key and returns the associated profile if valid.
    async fn verify_api_key(&self, api_key: &str) -> Result<Option<Profile>, AuthError>;

    /// Loads the profile for a signed-in email.
    async fn get_profile(&self, email: &str) -> Result<Profile, AuthError>;

    /// Changes a profile's password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the current password is
    /// incorrect or the new password is invalid.
    async fn change_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    /// Gets the current API key for a profile.
    async fn get_api_key(&self, email: &str) -> Result<String, AuthError>;

    /// Regenerates the API key for a profile and returns the new one.
    async fn regenerate_api_key(&self, email: &str) -> Result<String, AuthError>;
}
