//! Visitor repository

use common::error::{StoreError, StoreResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{FollowUpStatus, NewVisitor, Visitor};

use super::decode_enum;

const VISITOR_COLUMNS: &str =
    "id, name, phone, email, visit_date, invited_by, follow_up_status, notes";

fn visitor_from_row(row: &PgRow) -> StoreResult<Visitor> {
    Ok(Visitor {
        id: row.get("id"),
        name: row.get("name"),
        phone: row.get("phone"),
        email: row.get("email"),
        visit_date: row.get("visit_date"),
        invited_by: row.get("invited_by"),
        follow_up_status: decode_enum(row, "follow_up_status")?,
        notes: row.get("notes"),
    })
}

/// Visitor repository. Create, read, and a single status-transition
/// update on the follow-up field.
#[derive(Clone)]
pub struct VisitorRepository {
    pool: PgPool,
}

impl VisitorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch every visitor, most recent visit first
    pub async fn get_all(&self) -> StoreResult<Vec<Visitor>> {
        let rows = sqlx::query(&format!(
            "SELECT {VISITOR_COLUMNS} FROM visitors ORDER BY visit_date DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        rows.iter().map(visitor_from_row).collect()
    }

    /// Insert a new visitor and return the stored row
    pub async fn create(&self, new: &NewVisitor) -> StoreResult<Visitor> {
        info!("Recording visitor: {}", new.name);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO visitors
                (name, phone, email, visit_date, invited_by, follow_up_status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {VISITOR_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(new.visit_date)
        .bind(&new.invited_by)
        .bind(new.follow_up_status.as_str())
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::Write)?;

        visitor_from_row(&row)
    }

    /// Update the follow-up status of a visitor
    pub async fn update_follow_up(
        &self,
        id: Uuid,
        status: FollowUpStatus,
    ) -> StoreResult<Visitor> {
        info!("Updating follow-up of visitor {} to {}", id, status.as_str());

        let row = sqlx::query(&format!(
            "UPDATE visitors SET follow_up_status = $1 WHERE id = $2 RETURNING {VISITOR_COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::Write)?;

        visitor_from_row(&row)
    }
}
