//! # Role Repository
//!
//! Role grants and checks over the `user_roles` table.
//!
//! A user can hold several roles at once (e.g. a manager who also cashiers).
//! Policy - which roles may perform which action - lives with the caller;
//! this repository only answers "does this user hold this role?".

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;
use meridian_core::Role;

/// Repository for role grant operations.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: SqlitePool,
}

impl RoleRepository {
    /// Creates a new RoleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RoleRepository { pool }
    }

    /// Checks whether a user holds a role.
    pub async fn has_role(&self, user_id: &str, role: Role) -> StoreResult<bool> {
        let exists: i64 = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM user_roles WHERE user_id = ?1 AND role = ?2
            )
            "#,
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists != 0)
    }

    /// Grants a role to a user. Granting an already-held role is a no-op.
    pub async fn grant(&self, user_id: &str, role: Role) -> StoreResult<()> {
        debug!(user_id = %user_id, role = role.as_str(), "Granting role");

        sqlx::query(
            r#"
            INSERT INTO user_roles (id, user_id, role, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (user_id, role) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(role)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Revokes a role from a user. No-op when not held.
    pub async fn revoke(&self, user_id: &str, role: Role) -> StoreResult<()> {
        sqlx::query(r#"DELETE FROM user_roles WHERE user_id = ?1 AND role = ?2"#)
            .bind(user_id)
            .bind(role)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
