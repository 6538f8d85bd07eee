//! # Voucher Repository
//!
//! Database operations for discount vouchers.
//!
//! ## The Redemption Race
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Two registers redeem the same voucher (1 use left)                     │
//! │                                                                         │
//! │  Register A                        Register B                           │
//! │  ──────────                        ──────────                           │
//! │  evaluate: uses 4/5 ✓              evaluate: uses 4/5 ✓                 │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  redeem() ──► UPDATE ... WHERE     redeem() ──► same UPDATE             │
//! │              uses_count < max_uses                                      │
//! │       │                                 │                               │
//! │  1 row affected → redeemed         0 rows affected → exhausted          │
//! │                                                                         │
//! │  The WHERE clause makes check-and-increment a single atomic write;      │
//! │  the loser surfaces as VoucherError::Exhausted at checkout.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::StoreResult;
use crate::repository::{parse_decimal, parse_money};
use meridian_core::Voucher;

/// Repository for voucher database operations.
#[derive(Debug, Clone)]
pub struct VoucherRepository {
    pool: SqlitePool,
}

impl VoucherRepository {
    /// Creates a new VoucherRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VoucherRepository { pool }
    }

    /// Finds an active voucher by exact code match.
    ///
    /// The caller normalizes the code (trim + upper-case) first; codes are
    /// stored in canonical upper-case form.
    pub async fn find_active_by_code(&self, code: &str) -> StoreResult<Option<Voucher>> {
        let row = sqlx::query(
            r#"
            SELECT id, code, description, value, is_percentage, min_purchase,
                   max_uses, uses_count, expires_at, is_active, created_by, created_at
            FROM vouchers
            WHERE code = ?1 AND is_active = 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_voucher).transpose()
    }

    /// Inserts a voucher.
    pub async fn insert(&self, voucher: &Voucher) -> StoreResult<()> {
        debug!(id = %voucher.id, code = %voucher.code, "Inserting voucher");

        sqlx::query(
            r#"
            INSERT INTO vouchers (
                id, code, description, value, is_percentage, min_purchase,
                max_uses, uses_count, expires_at, is_active, created_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&voucher.id)
        .bind(&voucher.code)
        .bind(&voucher.description)
        .bind(voucher.value.to_string())
        .bind(voucher.is_percentage)
        .bind(voucher.min_purchase.amount().to_string())
        .bind(voucher.max_uses)
        .bind(voucher.uses_count)
        .bind(voucher.expires_at)
        .bind(voucher.is_active)
        .bind(&voucher.created_by)
        .bind(voucher.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Redeems one use of a voucher, atomically.
    ///
    /// The increment only applies while `uses_count < max_uses` holds AT
    /// WRITE TIME, closing the gap between eligibility evaluation and the
    /// usage increment under concurrent checkouts.
    ///
    /// ## Returns
    /// - `Ok(true)` - one use consumed
    /// - `Ok(false)` - voucher was exhausted (or deactivated) in the meantime
    pub async fn redeem(&self, code: &str) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE vouchers
            SET uses_count = uses_count + 1
            WHERE code = ?1
              AND is_active = 1
              AND (max_uses IS NULL OR uses_count < max_uses)
            "#,
        )
        .bind(code)
        .execute(&self.pool)
        .await?;

        let redeemed = result.rows_affected() > 0;
        debug!(code = %code, redeemed, "Voucher redemption attempt");
        Ok(redeemed)
    }

    /// Deactivates a voucher.
    pub async fn deactivate(&self, code: &str) -> StoreResult<()> {
        let result = sqlx::query(r#"UPDATE vouchers SET is_active = 0 WHERE code = ?1"#)
            .bind(code)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(crate::error::StoreError::not_found("Voucher", code));
        }

        Ok(())
    }

    /// Current uses count for a voucher (diagnostics and tests).
    pub async fn uses_count(&self, code: &str) -> StoreResult<i64> {
        let count: Option<i64> =
            sqlx::query_scalar(r#"SELECT uses_count FROM vouchers WHERE code = ?1"#)
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;

        count.ok_or_else(|| crate::error::StoreError::not_found("Voucher", code))
    }
}

/// Maps a database row to a Voucher.
fn map_voucher(row: &SqliteRow) -> StoreResult<Voucher> {
    Ok(Voucher {
        id: row.try_get("id")?,
        code: row.try_get("code")?,
        description: row.try_get("description")?,
        value: parse_decimal(&row.try_get::<String, _>("value")?, "value")?,
        is_percentage: row.try_get("is_percentage")?,
        min_purchase: parse_money(&row.try_get::<String, _>("min_purchase")?, "min_purchase")?,
        max_uses: row.try_get("max_uses")?,
        uses_count: row.try_get("uses_count")?,
        expires_at: row.try_get::<Option<DateTime<Utc>>, _>("expires_at")?,
        is_active: row.try_get("is_active")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
