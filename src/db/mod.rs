use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::profile_courses::CourseList;
use crate::entities::{courses, providers, subjects};

pub mod migrator;
pub mod repositories;

pub use repositories::course::{CourseWithProvider, NewCourse};
pub use repositories::user::{User, hash_password, hash_password_blocking};

/// A write was refused by a unique index.
#[derive(Debug, thiserror::Error)]
#[error("Unique constraint violated: {0}")]
pub struct UniqueViolation(pub String);

/// Turns a unique-index failure into [`UniqueViolation`] so callers can
/// match on it; any other error keeps `context`.
pub(crate) fn write_error(err: DbErr, context: &'static str) -> anyhow::Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => UniqueViolation(detail).into(),
        _ => anyhow::Error::new(err).context(context),
    }
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn profile_repo(&self) -> repositories::profile::ProfileRepository {
        repositories::profile::ProfileRepository::new(self.conn.clone())
    }

    fn subject_repo(&self) -> repositories::subject::SubjectRepository {
        repositories::subject::SubjectRepository::new(self.conn.clone())
    }

    fn course_repo(&self) -> repositories::course::CourseRepository {
        repositories::course::CourseRepository::new(self.conn.clone())
    }

    // Users

    pub async fn create_user_with_profile(
        &self,
        username: &str,
        email: &str,
        password_hash: String,
    ) -> Result<User> {
        self.user_repo()
            .create_with_profile(username, email, password_hash)
            .await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().email_exists(email).await
    }

    /// Returns the user when `login` (username or email) names an active
    /// account whose hash matches `password`.
    pub async fn verify_user_password(&self, login: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(login, password).await
    }

    pub async fn update_user_password_hash(&self, id: i32, password_hash: String) -> Result<()> {
        self.user_repo()
            .update_password_hash(id, password_hash)
            .await
    }

    pub async fn update_user_email(&self, id: i32, email: &str) -> Result<()> {
        self.user_repo().update_email(id, email).await
    }

    pub async fn set_user_active(&self, id: i32, is_active: bool) -> Result<()> {
        self.user_repo().set_active(id, is_active).await
    }

    pub async fn record_user_login(&self, id: i32) -> Result<()> {
        self.user_repo().record_login(id).await
    }

    // Profiles

    pub async fn profile_id_for_user(&self, user_id: i32) -> Result<Option<i32>> {
        self.profile_repo().profile_id_for_user(user_id).await
    }

    pub async fn add_profile_course(
        &self,
        profile_id: i32,
        course_id: i32,
        list: CourseList,
    ) -> Result<()> {
        self.profile_repo()
            .add_course(profile_id, course_id, list)
            .await
    }

    pub async fn remove_profile_course(
        &self,
        profile_id: i32,
        course_id: i32,
        list: CourseList,
    ) -> Result<()> {
        self.profile_repo()
            .remove_course(profile_id, course_id, list)
            .await
    }

    pub async fn profile_course_names(
        &self,
        profile_id: i32,
        list: CourseList,
    ) -> Result<Vec<String>> {
        self.profile_repo().course_names(profile_id, list).await
    }

    pub async fn add_profile_interest(&self, profile_id: i32, subject_id: i32) -> Result<()> {
        self.profile_repo()
            .add_interest(profile_id, subject_id)
            .await
    }

    pub async fn profile_interest_names(&self, profile_id: i32) -> Result<Vec<String>> {
        self.profile_repo().interest_names(profile_id).await
    }

    // Catalog

    pub async fn list_subjects(&self) -> Result<Vec<subjects::Model>> {
        self.subject_repo().list_all().await
    }

    pub async fn get_subject_by_name(&self, name: &str) -> Result<Option<subjects::Model>> {
        self.subject_repo().get_by_name(name).await
    }

    pub async fn find_subject(&self, key: &str) -> Result<Option<subjects::Model>> {
        self.subject_repo().find_by_key(key).await
    }

    pub async fn create_subject(&self, name: &str) -> Result<subjects::Model> {
        self.subject_repo().create(name).await
    }

    pub async fn list_courses(&self) -> Result<Vec<courses::Model>> {
        self.course_repo().list_all().await
    }

    pub async fn find_course(&self, key: &str) -> Result<Option<courses::Model>> {
        self.course_repo().find_by_key(key).await
    }

    pub async fn get_course_with_provider(&self, id: i32) -> Result<Option<CourseWithProvider>> {
        self.course_repo().get_with_provider(id).await
    }

    pub async fn list_courses_for_subject(
        &self,
        subject_id: i32,
    ) -> Result<Vec<CourseWithProvider>> {
        self.course_repo().list_for_subject(subject_id).await
    }

    pub async fn create_course(&self, course: NewCourse) -> Result<courses::Model> {
        self.course_repo().create(course).await
    }

    pub async fn tag_course(&self, course_id: i32, subject_id: i32) -> Result<()> {
        self.course_repo().tag(course_id, subject_id).await
    }

    pub async fn create_provider(&self, name: &str) -> Result<providers::Model> {
        self.course_repo().create_provider(name).await
    }
}
