use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::db::write_error;
use crate::entities::{prelude::*, user_profiles, users};

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub last_login: Option<String>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
            last_login: model.last_login,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a user and its empty profile in one transaction.
    /// `password_hash` must already be hashed.
    pub async fn create_with_profile(
        &self,
        username: &str,
        email: &str,
        password_hash: String,
    ) -> Result<User> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.conn.begin().await?;

        let user = users::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            is_active: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            last_login: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error(e, "Failed to insert user"))?;

        user_profiles::ActiveModel {
            user_id: Set(user.id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert user profile")?;

        txn.commit().await?;
        Ok(User::from(user))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.get_by_email(email).await?.is_some())
    }

    /// Verify a password for a username or email.
    ///
    /// Inactive accounts never verify. Uses `spawn_blocking` because Argon2
    /// is CPU-intensive.
    pub async fn verify_password(&self, login: &str, password: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(login))
                    .add(users::Column::Email.eq(login)),
            )
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        if !user.is_active {
            return Ok(None);
        }

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid.then(|| User::from(user)))
    }

    /// Replace the stored hash. `password_hash` must already be hashed.
    pub async fn update_password_hash(&self, id: i32, password_hash: String) -> Result<()> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for password update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn update_email(&self, id: i32, email: &str) -> Result<()> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for email update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let mut active: users::ActiveModel = user.into();
        active.email = Set(email.to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active
            .update(&self.conn)
            .await
            .map_err(|e| write_error(e, "Failed to update email"))?;

        Ok(())
    }

    pub async fn set_active(&self, id: i32, is_active: bool) -> Result<()> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for activation change")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let mut active: users::ActiveModel = user.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn record_login(&self, id: i32) -> Result<()> {
        Users::update_many()
            .col_expr(
                users::Column::LastLogin,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to record login")?;

        Ok(())
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the argon2 crate defaults.
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

/// Hash on the blocking pool.
pub async fn hash_password_blocking(password: &str, config: &SecurityConfig) -> Result<String> {
    let password = password.to_string();
    let config = config.clone();
    task::spawn_blocking(move || hash_password(&password, Some(&config)))
        .await
        .context("Password hashing task panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_is_salted() {
        let config = SecurityConfig::default();
        let first = hash_password("qwerty123", Some(&config)).unwrap();
        let second = hash_password("qwerty123", Some(&config)).unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
    }

    #[test]
    fn test_hash_verifies_with_default_verifier() {
        let config = SecurityConfig::default();
        let hash = hash_password("qwerty123", Some(&config)).unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();

        assert!(
            Argon2::default()
                .verify_password(b"qwerty123", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrong-password", &parsed)
                .is_err()
        );
    }
}
