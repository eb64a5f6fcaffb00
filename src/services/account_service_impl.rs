//! `SeaORM` implementation of the `AccountService` trait.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::{Store, UniqueViolation, hash_password_blocking};
use crate::services::account_service::{AccountError, AccountService, UserInfo};
use crate::services::validation::{check_password_policy, username_digest, valid_email_address};

/// A concurrent signup or email change can pass the existence check and
/// still lose at the unique index.
fn taken_or_internal(err: anyhow::Error) -> AccountError {
    if err.is::<UniqueViolation>() {
        AccountError::EmailTaken
    } else {
        AccountError::from(err)
    }
}

pub struct SeaOrmAccountService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn check_password(&self, password: &str, confirm: &str) -> Result<(), AccountError> {
        if check_password_policy(password, confirm, self.security.min_password_length) {
            Ok(())
        } else {
            Err(AccountError::InvalidPassword(
                self.security.min_password_length,
            ))
        }
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn register(
        &self,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<UserInfo, AccountError> {
        let email = email.trim();

        if !valid_email_address(email) {
            return Err(AccountError::InvalidEmail);
        }

        self.check_password(password, password_confirm)?;

        if self.store.email_exists(email).await? {
            return Err(AccountError::EmailTaken);
        }

        let username = username_digest(email);
        if self.store.get_user_by_username(&username).await?.is_some() {
            // An older account registered this address and changed away from it.
            return Err(AccountError::EmailTaken);
        }

        let password_hash = hash_password_blocking(password, &self.security).await?;
        let user = self
            .store
            .create_user_with_profile(&username, email, password_hash)
            .await
            .map_err(taken_or_internal)?;

        info!(user_id = user.id, "Registered new account");
        Ok(UserInfo::from(user))
    }

    async fn authenticate(&self, login: &str, password: &str) -> Result<UserInfo, AccountError> {
        let login = login.trim();
        if login.is_empty() || password.is_empty() {
            return Err(AccountError::InvalidCredentials);
        }

        let Some(user) = self.store.verify_user_password(login, password).await? else {
            warn!("Failed login attempt");
            return Err(AccountError::InvalidCredentials);
        };

        self.store.record_user_login(user.id).await?;

        let user = self
            .store
            .get_user(user.id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        Ok(UserInfo::from(user))
    }

    async fn get_user(&self, user_id: i32) -> Result<Option<UserInfo>, AccountError> {
        let user = self.store.get_user(user_id).await?;
        Ok(user.filter(|u| u.is_active).map(UserInfo::from))
    }

    async fn unique_user(&self, email: &str) -> Result<bool, AccountError> {
        Ok(!self.store.email_exists(email.trim()).await?)
    }

    async fn change_password(
        &self,
        user_id: i32,
        password: &str,
        password_confirm: &str,
    ) -> Result<(), AccountError> {
        self.check_password(password, password_confirm)?;

        if self.store.get_user(user_id).await?.is_none() {
            return Err(AccountError::UserNotFound);
        }

        let password_hash = hash_password_blocking(password, &self.security).await?;
        self.store
            .update_user_password_hash(user_id, password_hash)
            .await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    async fn change_email(&self, user_id: i32, new_email: &str) -> Result<UserInfo, AccountError> {
        let new_email = new_email.trim();

        if !valid_email_address(new_email) {
            return Err(AccountError::InvalidEmail);
        }

        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        if user.email == new_email {
            return Ok(UserInfo::from(user));
        }

        if let Some(owner) = self.store.get_user_by_email(new_email).await?
            && owner.id != user_id
        {
            return Err(AccountError::EmailTaken);
        }

        self.store
            .update_user_email(user_id, new_email)
            .await
            .map_err(taken_or_internal)?;
        info!(user_id, "Email changed");

        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        Ok(UserInfo::from(user))
    }

    async fn deactivate(&self, user_id: i32) -> Result<(), AccountError> {
        if self.store.get_user(user_id).await?.is_none() {
            return Err(AccountError::UserNotFound);
        }

        self.store.set_user_active(user_id, false).await?;
        info!(user_id, "Account deactivated");
        Ok(())
    }
}
