//! # Settings Repository
//!
//! Key/value application settings (`app_settings` table).
//!
//! Checkout-relevant keys:
//! - `tax_rate` - percentage as a decimal string, e.g. `"7.5"`
//! - `currency` - ISO 4217 code, e.g. `"USD"`
//!
//! Callers load these into an explicit configuration struct at session start
//! and own the refresh contract; nothing in the checkout path reads settings
//! behind the caller's back.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::repository::parse_decimal;
use meridian_core::TaxRate;

/// Well-known settings keys.
pub const KEY_TAX_RATE: &str = "tax_rate";
pub const KEY_CURRENCY: &str = "currency";

/// Repository for application settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Gets a setting value by key.
    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar(r#"SELECT value FROM app_settings WHERE key = ?1"#)
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Sets a setting value, inserting or updating as needed.
    pub async fn set(&self, key: &str, value: &str, updated_by: Option<&str>) -> StoreResult<()> {
        debug!(key = %key, "Updating setting");

        sqlx::query(
            r#"
            INSERT INTO app_settings (id, key, value, updated_by, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                updated_by = excluded.updated_by,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(key)
        .bind(value)
        .bind(updated_by)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Reads the configured tax rate, if any.
    ///
    /// The stored value is a percentage (`"7.5"` = 7.5%).
    pub async fn tax_rate(&self) -> StoreResult<Option<TaxRate>> {
        let Some(raw) = self.get(KEY_TAX_RATE).await? else {
            return Ok(None);
        };

        let pct = parse_decimal(&raw, KEY_TAX_RATE)?;
        TaxRate::from_percent(pct)
            .map(Some)
            .ok_or_else(|| StoreError::Decode {
                column: KEY_TAX_RATE.to_string(),
                reason: format!("percentage out of range: {}", raw),
            })
    }

    /// Reads the configured currency code, if any.
    pub async fn currency(&self) -> StoreResult<Option<String>> {
        self.get(KEY_CURRENCY).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};

    #[tokio::test]
    async fn test_get_set_upsert() {
        let store = Store::connect(StoreConfig::in_memory()).await.unwrap();
        let repo = store.settings();

        assert_eq!(repo.get("currency").await.unwrap(), None);

        repo.set("currency", "USD", Some("admin-1")).await.unwrap();
        assert_eq!(repo.get("currency").await.unwrap().as_deref(), Some("USD"));

        repo.set("currency", "NGN", None).await.unwrap();
        assert_eq!(repo.get("currency").await.unwrap().as_deref(), Some("NGN"));
    }

    #[tokio::test]
    async fn test_tax_rate_parsing() {
        let store = Store::connect(StoreConfig::in_memory()).await.unwrap();
        let repo = store.settings();

        assert_eq!(repo.tax_rate().await.unwrap(), None);

        repo.set(KEY_TAX_RATE, "7.5", None).await.unwrap();
        assert_eq!(repo.tax_rate().await.unwrap(), Some(TaxRate::from_bps(750)));

        repo.set(KEY_TAX_RATE, "garbage", None).await.unwrap();
        assert!(matches!(
            repo.tax_rate().await.unwrap_err(),
            StoreError::Decode { .. }
        ));

        repo.set(KEY_TAX_RATE, "250", None).await.unwrap();
        assert!(repo.tax_rate().await.is_err());
    }
}
