use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::profiles;
use crate::models::Role;

/// Profile data returned from the repository (without the password hash)
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub api_key: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<profiles::Model> for Profile {
    fn from(model: profiles::Model) -> Self {
        let role = model.role.parse().unwrap_or(Role::Lecturer);
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            role,
            api_key: model.api_key,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct ProfileRepository {
    conn: DatabaseConnection,
}

impl ProfileRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Create a new profile. The password is hashed with Argon2id before
    /// the row is written; a fresh API key is generated.
    pub async fn create(
        &self,
        email: &str,
        full_name: &str,
        role: Role,
        password: &str,
        security: Option<&SecurityConfig>,
    ) -> Result<Profile> {
        let password = password.to_string();
        let security = security.cloned();
        let password_hash =
            task::spawn_blocking(move || hash_password(&password, security.as_ref()))
                .await
                .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let active = profiles::ActiveModel {
            email: Set(email.to_string()),
            full_name: Set(full_name.to_string()),
            role: Set(role.as_str().to_string()),
            password_hash: Set(password_hash),
            api_key: Set(generate_api_key()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert profile")?;

        Ok(Profile::from(model))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Profile>> {
        let profile = profiles::Entity::find()
            .filter(profiles::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query profile by email")?;

        Ok(profile.map(Profile::from))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Profile>> {
        let profile = profiles::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query profile by ID")?;

        Ok(profile.map(Profile::from))
    }

    pub async fn list(&self) -> Result<Vec<Profile>> {
        let rows = profiles::Entity::find()
            .order_by_asc(profiles::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list profiles")?;

        Ok(rows.into_iter().map(Profile::from).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        let count = profiles::Entity::find().count(&self.conn).await?;
        Ok(count)
    }

    /// Verify password for a profile
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<bool> {
        let profile = profiles::Entity::find()
            .filter(profiles::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query profile for password verification")?;

        let Some(profile) = profile else {
            return Ok(false);
        };

        let password_hash = profile.password_hash;
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid)
    }

    pub async fn update_password(
        &self,
        email: &str,
        new_password: &str,
        security: Option<&SecurityConfig>,
    ) -> Result<()> {
        let profile = profiles::Entity::find()
            .filter(profiles::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query profile for password update")?
            .ok_or_else(|| anyhow::anyhow!("Profile not found: {email}"))?;

        let password = new_password.to_string();
        let security = security.cloned();
        let new_hash = task::spawn_blocking(move || hash_password(&password, security.as_ref()))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: profiles::ActiveModel = profile.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Set the role on a profile. This is the only write path for roles.
    pub async fn update_role(&self, id: i32, role: Role) -> Result<bool> {
        let Some(profile) = profiles::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query profile for role update")?
        else {
            return Ok(false);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: profiles::ActiveModel = profile.into();
        active.role = Set(role.as_str().to_string());
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(true)
    }

    /// Verify API key and return the associated profile
    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<Profile>> {
        let profile = profiles::Entity::find()
            .filter(profiles::Column::ApiKey.eq(api_key))
            .one(&self.conn)
            .await
            .context("Failed to query profile by API key")?;

        Ok(profile.map(Profile::from))
    }

    pub async fn get_api_key(&self, email: &str) -> Result<Option<String>> {
        let profile = profiles::Entity::find()
            .filter(profiles::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query profile for API key")?;

        Ok(profile.map(|p| p.api_key))
    }

    pub async fn regenerate_api_key(&self, email: &str) -> Result<String> {
        let profile = profiles::Entity::find()
            .filter(profiles::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query profile for API key regeneration")?
            .ok_or_else(|| anyhow::anyhow!("Profile not found: {email}"))?;

        let new_api_key = generate_api_key();
        let now = chrono::Utc::now().to_rfc3339();

        let mut active: profiles::ActiveModel = profile.into();
        active.api_key = Set(new_api_key.clone());
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(new_api_key)
    }
}

/// Hash a password using Argon2id with optional custom params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Generate a random API key (64 character hex string)
#[must_use]
pub fn generate_api_key() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
