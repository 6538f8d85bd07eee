//! # Product Repository
//!
//! Database operations for the sellable catalog.
//!
//! The checkout path only ever reads (`list_active` feeds the in-memory
//! catalog index); writes exist for back-office management and seeding.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::StoreResult;
use crate::repository::parse_money;
use meridian_core::Product;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all active (sellable) products.
    ///
    /// This is the catalog index's refresh source.
    pub async fn list_active(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, unit_price, barcode, sku, category, cost_price,
                   is_active, created_at, updated_at
            FROM products
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_product).collect()
    }

    /// Gets a product by ID (active or not).
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, unit_price, barcode, sku, category, cost_price,
                   is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_product).transpose()
    }

    /// Inserts a product.
    pub async fn insert(&self, product: &Product) -> StoreResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, unit_price, barcode, sku, category, cost_price,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.unit_price.amount().to_string())
        .bind(&product.barcode)
        .bind(&product.sku)
        .bind(&product.category)
        .bind(product.cost_price.map(|c| c.amount().to_string()))
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deactivates a product (soft delete).
    pub async fn deactivate(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(crate::error::StoreError::not_found("Product", id));
        }

        Ok(())
    }
}

/// Maps a database row to a Product.
fn map_product(row: &SqliteRow) -> StoreResult<Product> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        unit_price: parse_money(&row.try_get::<String, _>("unit_price")?, "unit_price")?,
        barcode: row.try_get("barcode")?,
        sku: row.try_get("sku")?,
        category: row.try_get("category")?,
        cost_price: row
            .try_get::<Option<String>, _>("cost_price")?
            .map(|raw| parse_money(&raw, "cost_price"))
            .transpose()?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
