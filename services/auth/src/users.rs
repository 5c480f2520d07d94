//! User administration: account creation and role assignment
//!
//! Accounts live with the external provider; the role assignment lives in
//! the store's `user_roles` join table. Both flows are gated behind the
//! super admin role at the call site.

use std::sync::Arc;

use anyhow::Result;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{Identity, Role};
use crate::provider::AuthProvider;
use crate::resolver::role_from_row;
use crate::validation;

/// User administration service
#[derive(Clone)]
pub struct UserAdmin {
    provider: Arc<dyn AuthProvider>,
    pool: PgPool,
}

impl UserAdmin {
    pub fn new(provider: Arc<dyn AuthProvider>, pool: PgPool) -> Self {
        Self { provider, pool }
    }

    /// List every role defined in the store
    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, permissions
            FROM roles
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(role_from_row).collect()
    }

    async fn role_id_by_name(&self, role_name: &str) -> Result<Uuid> {
        let row = sqlx::query("SELECT id FROM roles WHERE name = $1")
            .bind(role_name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| anyhow::anyhow!("unknown role: {}", role_name))?;

        Ok(row.get("id"))
    }

    /// Create a confirmed account with the provider and assign it a role
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        role_name: &str,
    ) -> Result<Identity> {
        validation::validate_email(email).map_err(|e| anyhow::anyhow!(e))?;
        validation::validate_password(password).map_err(|e| anyhow::anyhow!(e))?;

        info!("Creating user {} with role {}", email, role_name);

        // The role must exist before the account is created so a typo in
        // the role name doesn't leave an unassigned account behind.
        let role_id = self.role_id_by_name(role_name).await?;
        let identity = self.provider.admin_create_user(email, password).await?;

        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(identity.id)
            .bind(role_id)
            .execute(&self.pool)
            .await?;

        Ok(identity)
    }

    /// Replace a user's role assignments with the named role
    pub async fn update_user_role(&self, user_id: Uuid, role_name: &str) -> Result<()> {
        let role_id = self.role_id_by_name(role_name).await?;

        info!("Updating role of user {} to {}", user_id, role_name);

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
