//! Equipment repository

use common::error::{StoreError, StoreResult};
use sqlx::{PgPool, QueryBuilder, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{Equipment, NewEquipment, UpdateEquipment};

use super::decode_enum;

const EQUIPMENT_COLUMNS: &str =
    "id, name, category, condition, purchase_date, value, location, notes";

fn equipment_from_row(row: &PgRow) -> StoreResult<Equipment> {
    Ok(Equipment {
        id: row.get("id"),
        name: row.get("name"),
        category: row.get("category"),
        condition: decode_enum(row, "condition")?,
        purchase_date: row.get("purchase_date"),
        value: row.get("value"),
        location: row.get("location"),
        notes: row.get("notes"),
    })
}

/// Equipment repository
#[derive(Clone)]
pub struct EquipmentRepository {
    pool: PgPool,
}

impl EquipmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch every equipment item, newest first
    pub async fn get_all(&self) -> StoreResult<Vec<Equipment>> {
        let rows = sqlx::query(&format!(
            "SELECT {EQUIPMENT_COLUMNS} FROM equipment ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        rows.iter().map(equipment_from_row).collect()
    }

    /// Insert a new equipment item and return the stored row
    pub async fn create(&self, new: &NewEquipment) -> StoreResult<Equipment> {
        info!("Registering equipment: {}", new.name);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO equipment
                (name, category, condition, purchase_date, value, location, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {EQUIPMENT_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(&new.category)
        .bind(new.condition.as_str())
        .bind(new.purchase_date)
        .bind(new.value)
        .bind(&new.location)
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::Write)?;

        equipment_from_row(&row)
    }

    /// Apply a partial update; only the provided fields enter the
    /// statement.
    pub async fn update(&self, id: Uuid, updates: &UpdateEquipment) -> StoreResult<Equipment> {
        let mut qb = QueryBuilder::new("UPDATE equipment SET updated_at = NOW()");

        if let Some(name) = &updates.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(category) = &updates.category {
            qb.push(", category = ").push_bind(category);
        }
        if let Some(condition) = updates.condition {
            qb.push(", condition = ").push_bind(condition.as_str());
        }
        if let Some(purchase_date) = updates.purchase_date {
            qb.push(", purchase_date = ").push_bind(purchase_date);
        }
        if let Some(value) = updates.value {
            qb.push(", value = ").push_bind(value);
        }
        if let Some(location) = &updates.location {
            qb.push(", location = ").push_bind(location);
        }
        if let Some(notes) = &updates.notes {
            qb.push(", notes = ")
                .push_bind(Some(notes.clone()).filter(|n| !n.is_empty()));
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {EQUIPMENT_COLUMNS}"));

        let row = qb
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::Write)?;

        equipment_from_row(&row)
    }

    /// Delete an equipment item by id. Deleting an absent row is a no-op
    /// success.
    pub async fn delete(&self, id: Uuid) -> StoreResult<()> {
        info!("Deleting equipment: {}", id);

        sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Write)?;

        Ok(())
    }
}
