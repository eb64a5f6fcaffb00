//! Domain service for accounts.
//!
//! Handles registration, login, password and email changes, and
//! deactivation. Every rejected call leaves the stored account untouched.

use serde::Serialize;
use thiserror::Error;

use crate::db::User;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Passwords must match and be at least {0} characters")]
    InvalidPassword(usize),

    #[error("An account with that email already exists")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// User info DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

/// Domain service trait for accounts.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Creates a user and its profile.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidEmail`], [`AccountError::InvalidPassword`]
    /// or [`AccountError::EmailTaken`] without creating anything.
    async fn register(
        &self,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<UserInfo, AccountError>;

    /// Checks a username or email against its password.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] for unknown, inactive or
    /// mismatched accounts alike.
    async fn authenticate(&self, login: &str, password: &str) -> Result<UserInfo, AccountError>;

    /// Gets an active user by id.
    async fn get_user(&self, user_id: i32) -> Result<Option<UserInfo>, AccountError>;

    /// True when no account uses this email.
    async fn unique_user(&self, email: &str) -> Result<bool, AccountError>;

    /// Replaces the password. The old one stops working immediately.
    async fn change_password(
        &self,
        user_id: i32,
        password: &str,
        password_confirm: &str,
    ) -> Result<(), AccountError>;

    /// Replaces the email if it is well formed and not used by someone else.
    async fn change_email(&self, user_id: i32, new_email: &str) -> Result<UserInfo, AccountError>;

    /// Soft-deletes the account.
    async fn deactivate(&self, user_id: i32) -> Result<(), AccountError>;
}
