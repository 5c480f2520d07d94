//! Member repository

use common::error::{StoreError, StoreResult};
use sqlx::{PgPool, QueryBuilder, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{Member, NewMember, UpdateMember};

use super::decode_enum;

const MEMBER_COLUMNS: &str = "id, member_number, name, phone, email, department, \
     baptism_status, status, join_date, birth_date, address, photo";

fn member_from_row(row: &PgRow) -> StoreResult<Member> {
    Ok(Member {
        id: row.get("id"),
        member_number: row.get("member_number"),
        name: row.get("name"),
        phone: row.get("phone"),
        email: row.get("email"),
        department: decode_enum(row, "department")?,
        baptism_status: decode_enum(row, "baptism_status")?,
        status: decode_enum(row, "status")?,
        join_date: row.get("join_date"),
        birth_date: row.get("birth_date"),
        address: row.get("address"),
        photo: row.get("photo"),
    })
}

/// Member repository
#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch every member, newest first
    pub async fn get_all(&self) -> StoreResult<Vec<Member>> {
        let rows = sqlx::query(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        rows.iter().map(member_from_row).collect()
    }

    /// Insert a new member and return the stored row
    pub async fn create(&self, new: &NewMember) -> StoreResult<Member> {
        info!("Creating member: {}", new.name);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO members
                (member_number, name, phone, email, department, baptism_status,
                 status, join_date, birth_date, address, photo)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {MEMBER_COLUMNS}
            "#
        ))
        .bind(new.member_number)
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(new.department.as_str())
        .bind(new.baptism_status.as_str())
        .bind(new.status.as_str())
        .bind(new.join_date)
        .bind(new.birth_date)
        .bind(&new.address)
        .bind(new.photo.as_deref().filter(|p| !p.is_empty()))
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::Write)?;

        member_from_row(&row)
    }

    /// Apply a partial update; only the provided fields enter the
    /// statement.
    pub async fn update(&self, id: Uuid, updates: &UpdateMember) -> StoreResult<Member> {
        let mut qb = QueryBuilder::new("UPDATE members SET updated_at = NOW()");

        if let Some(member_number) = updates.member_number {
            qb.push(", member_number = ").push_bind(member_number);
        }
        if let Some(name) = &updates.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(phone) = &updates.phone {
            qb.push(", phone = ").push_bind(phone);
        }
        if let Some(email) = &updates.email {
            qb.push(", email = ").push_bind(email);
        }
        if let Some(department) = updates.department {
            qb.push(", department = ").push_bind(department.as_str());
        }
        if let Some(baptism_status) = updates.baptism_status {
            qb.push(", baptism_status = ")
                .push_bind(baptism_status.as_str());
        }
        if let Some(status) = updates.status {
            qb.push(", status = ").push_bind(status.as_str());
        }
        if let Some(join_date) = updates.join_date {
            qb.push(", join_date = ").push_bind(join_date);
        }
        if let Some(birth_date) = updates.birth_date {
            qb.push(", birth_date = ").push_bind(birth_date);
        }
        if let Some(address) = &updates.address {
            qb.push(", address = ").push_bind(address);
        }
        if let Some(photo) = &updates.photo {
            // An empty string clears the photo.
            qb.push(", photo = ")
                .push_bind(Some(photo.clone()).filter(|p| !p.is_empty()));
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {MEMBER_COLUMNS}"));

        let row = qb
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::Write)?;

        member_from_row(&row)
    }

    /// Delete a member by id. Deleting an absent row is a no-op success.
    pub async fn delete(&self, id: Uuid) -> StoreResult<()> {
        info!("Deleting member: {}", id);

        sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Write)?;

        Ok(())
    }
}
