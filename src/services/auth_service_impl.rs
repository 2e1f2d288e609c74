//! [`AuthService`] backed by the profile repository.

use tracing::info;

use crate::config::SecurityConfig;
use crate::db::{Profile, Store};
use crate::models::Role;

use super::auth_service::{AuthError, AuthService, LoginResult};

pub struct StoreAuthService {
    store: Store,
    security: SecurityConfig,
}

impl StoreAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn validate_password(password: &str) -> Result<(), AuthError> {
        if password.len() < 8 {
            return Err(AuthError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_email(email: &str) -> Result<(), AuthError> {
        // Not a full RFC parse; just enough to catch obvious mistakes.
        if email.len() < 3 || !email.contains('@') {
            return Err(AuthError::Validation("Invalid email address".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AuthService for StoreAuthService {
    async fn register(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> Result<LoginResult, AuthError> {
        Self::validate_email(email)?;
        Self::validate_password(password)?;

        if full_name.trim().is_empty() {
            return Err(AuthError::Validation("Full name is required".to_string()));
        }

        if self.store.get_profile_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        // Exactly one profile per registration; role always starts as lecturer.
        let profile = self
            .store
            .create_profile(email, full_name, Role::Lecturer, password, Some(&self.security))
            .await?;

        info!("Registered new lecturer profile: {email}");
        Ok(LoginResult::from(profile))
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let is_valid = self.store.verify_profile_password(email, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let profile = self
            .store
            .get_profile_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(LoginResult::from(profile))
    }

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<Profile>, AuthError> {
        Ok(self.store.verify_api_key(api_key).await?)
    }

    async fn get_profile(&self, email: &str) -> Result<Profile, AuthError> {
        self.store
            .get_profile_by_email(email)
            .await?
            .ok_or(AuthError::ProfileNotFound)
    }

    async fn change_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        Self::validate_password(new_password)?;

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let is_valid = self
            .store
            .verify_profile_password(email, current_password)
            .await?;

        if !is_valid {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        self.store
            .update_profile_password(email, new_password, Some(&self.security))
            .await?;

        info!("Password changed for profile: {email}");
        Ok(())
    }

    async fn get_api_key(&self, email: &str) -> Result<String, AuthError> {
        self.store
            .get_profile_api_key(email)
            .await?
            .ok_or(AuthError::ProfileNotFound)
    }

    async fn regenerate_api_key(&self, email: &str) -> Result<String, AuthError> {
        let key = self.store.regenerate_profile_api_key(email).await?;
        info!("API key regenerated for profile: {email}");
        Ok(key)
    }
}
