//! Donation repository

use common::error::{StoreError, StoreResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use crate::models::{Donation, NewDonation};

use super::decode_enum;

const DONATION_COLUMNS: &str =
    "id, member_id, amount, category, date, method, notes, receipt_sent";

fn donation_from_row(row: &PgRow) -> StoreResult<Donation> {
    Ok(Donation {
        id: row.get("id"),
        member_id: row.get("member_id"),
        amount: row.get("amount"),
        category: decode_enum(row, "category")?,
        date: row.get("date"),
        method: decode_enum(row, "method")?,
        notes: row.get("notes"),
        receipt_sent: row.get("receipt_sent"),
    })
}

/// Donation repository. Create and read only.
#[derive(Clone)]
pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch every donation, most recent first
    pub async fn get_all(&self) -> StoreResult<Vec<Donation>> {
        let rows = sqlx::query(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        rows.iter().map(donation_from_row).collect()
    }

    /// Insert a new donation and return the stored row
    pub async fn create(&self, new: &NewDonation) -> StoreResult<Donation> {
        info!(
            "Recording {} donation of {} for member {}",
            new.category.as_str(),
            new.amount,
            new.member_id
        );

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO donations
                (member_id, amount, category, date, method, notes, receipt_sent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {DONATION_COLUMNS}
            "#
        ))
        .bind(new.member_id)
        .bind(new.amount)
        .bind(new.category.as_str())
        .bind(new.date)
        .bind(new.method.as_str())
        .bind(&new.notes)
        .bind(new.receipt_sent)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::Write)?;

        donation_from_row(&row)
    }
}
