//! Attendance repository and local pre-create checks
//!
//! The store does not enforce uniqueness on (service date, service type),
//! so a best-effort duplicate check runs against the already-loaded
//! in-memory set before any insert. Two concurrent clients can still both
//! pass the check; real uniqueness would have to live in the store.

use chrono::NaiveDate;
use common::error::{StoreError, StoreResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use crate::models::{AttendanceRecord, NewAttendanceRecord, ServiceType};

use super::decode_enum;

const ATTENDANCE_COLUMNS: &str = "id, service_date, service_type, total_count, men_count, \
     women_count, youth_count, children_count, guests_count, notes";

fn attendance_from_row(row: &PgRow) -> StoreResult<AttendanceRecord> {
    Ok(AttendanceRecord {
        id: row.get("id"),
        service_date: row.get("service_date"),
        service_type: decode_enum(row, "service_type")?,
        total_count: row.get("total_count"),
        men_count: row.get("men_count"),
        women_count: row.get("women_count"),
        youth_count: row.get("youth_count"),
        children_count: row.get("children_count"),
        guests_count: row.get("guests_count"),
        notes: row.get("notes"),
    })
}

/// Find an already-loaded record with the same (service date, service
/// type) composite key.
pub fn find_duplicate(
    loaded: &[AttendanceRecord],
    service_date: NaiveDate,
    service_type: ServiceType,
) -> Option<&AttendanceRecord> {
    loaded
        .iter()
        .find(|record| record.service_date == service_date && record.service_type == service_type)
}

/// Returns the mismatch amount when the category sub-counts do not sum to
/// the declared total, or None when they agree.
pub fn count_mismatch(new: &NewAttendanceRecord) -> Option<i32> {
    let sum = new.category_sum();
    if sum == new.total_count {
        None
    } else {
        Some((sum - new.total_count).abs())
    }
}

/// Attendance repository. Create and read only; counts are corrected by
/// recording a new service, not by editing history.
#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch every attendance record, most recent service first
    pub async fn get_all(&self) -> StoreResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance ORDER BY service_date DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        rows.iter().map(attendance_from_row).collect()
    }

    /// Insert a new attendance record and return the stored row
    pub async fn create(&self, new: &NewAttendanceRecord) -> StoreResult<AttendanceRecord> {
        info!(
            "Recording attendance for {} ({})",
            new.service_date, new.service_type
        );

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO attendance
                (service_date, service_type, total_count, men_count, women_count,
                 youth_count, children_count, guests_count, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(new.service_date)
        .bind(new.service_type.as_str())
        .bind(new.total_count)
        .bind(new.men_count)
        .bind(new.women_count)
        .bind(new.youth_count)
        .bind(new.children_count)
        .bind(new.guests_count)
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::Write)?;

        attendance_from_row(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record(date: &str, service_type: ServiceType) -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4(),
            service_date: date.parse().unwrap(),
            service_type,
            total_count: 100,
            men_count: 30,
            women_count: 40,
            youth_count: 15,
            children_count: 10,
            guests_count: 5,
            notes: None,
        }
    }

    fn submission(total: i32, counts: [i32; 5]) -> NewAttendanceRecord {
        NewAttendanceRecord {
            service_date: "2024-01-07".parse().unwrap(),
            service_type: ServiceType::SundayEncounter,
            total_count: total,
            men_count: counts[0],
            women_count: counts[1],
            youth_count: counts[2],
            children_count: counts[3],
            guests_count: counts[4],
            notes: None,
        }
    }

    #[test]
    fn test_count_mismatch_reports_difference() {
        // 45+65+25+15+8 = 158 against a declared total of 150.
        let new = submission(150, [45, 65, 25, 15, 8]);
        assert_eq!(count_mismatch(&new), Some(8));
    }

    #[test]
    fn test_matching_counts_pass() {
        let new = submission(158, [45, 65, 25, 15, 8]);
        assert_eq!(count_mismatch(&new), None);
    }

    #[test]
    fn test_duplicate_detected_on_composite_key() {
        let loaded = vec![
            record("2024-01-07", ServiceType::SundayEncounter),
            record("2024-01-10", ServiceType::WednesdayMiracle),
        ];

        assert!(
            find_duplicate(
                &loaded,
                "2024-01-07".parse().unwrap(),
                ServiceType::SundayEncounter
            )
            .is_some()
        );

        // Same date, different service: not a duplicate.
        assert!(
            find_duplicate(
                &loaded,
                "2024-01-07".parse().unwrap(),
                ServiceType::FridayPrayer
            )
            .is_none()
        );

        // Same service, different date: not a duplicate.
        assert!(
            find_duplicate(
                &loaded,
                "2024-01-14".parse().unwrap(),
                ServiceType::SundayEncounter
            )
            .is_none()
        );
    }
}
