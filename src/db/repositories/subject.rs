use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{prelude::*, subjects};

pub struct SubjectRepository {
    conn: DatabaseConnection,
}

impl SubjectRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<subjects::Model>> {
        Subjects::find()
            .order_by_asc(subjects::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list subjects")
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<subjects::Model>> {
        Subjects::find()
            .filter(subjects::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query subject by name")
    }

    /// Resolve a form value to a subject: numeric keys match the id first,
    /// anything else (or an unmatched id) matches the name.
    pub async fn find_by_key(&self, key: &str) -> Result<Option<subjects::Model>> {
        if let Ok(id) = key.trim().parse::<i32>() {
            let subject = Subjects::find_by_id(id)
                .one(&self.conn)
                .await
                .context("Failed to query subject by ID")?;

            if subject.is_some() {
                return Ok(subject);
            }
        }

        self.get_by_name(key).await
    }

    pub async fn create(&self, name: &str) -> Result<subjects::Model> {
        subjects::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to create subject '{name}'"))
    }
}
