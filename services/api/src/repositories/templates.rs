//! Message template repository

use common::error::{StoreError, StoreResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{MessageTemplate, NewMessageTemplate};

use super::decode_enum;

fn template_from_row(row: &PgRow) -> StoreResult<MessageTemplate> {
    Ok(MessageTemplate {
        id: row.get("id"),
        name: row.get("name"),
        subject: row.get("subject"),
        content: row.get("content"),
        kind: decode_enum(row, "type")?,
    })
}

/// Message template repository. Create, read, and delete.
#[derive(Clone)]
pub struct TemplateRepository {
    pool: PgPool,
}

impl TemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch every template, newest first
    pub async fn get_all(&self) -> StoreResult<Vec<MessageTemplate>> {
        let rows = sqlx::query(
            "SELECT id, name, subject, content, type FROM message_templates \
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        rows.iter().map(template_from_row).collect()
    }

    /// Insert a new template and return the stored row
    pub async fn create(&self, new: &NewMessageTemplate) -> StoreResult<MessageTemplate> {
        info!("Creating {} template: {}", new.kind.as_str(), new.name);

        let row = sqlx::query(
            r#"
            INSERT INTO message_templates (name, subject, content, type)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, subject, content, type
            "#,
        )
        .bind(&new.name)
        .bind(&new.subject)
        .bind(&new.content)
        .bind(new.kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::Write)?;

        template_from_row(&row)
    }

    /// Delete a template by id. Deleting an absent row is a no-op
    /// success.
    pub async fn delete(&self, id: Uuid) -> StoreResult<()> {
        info!("Deleting template: {}", id);

        sqlx::query("DELETE FROM message_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Write)?;

        Ok(())
    }
}
