//! # Transaction Repository
//!
//! Database operations for sale transactions, their line items, and payments.
//!
//! ## Checkout Persistence Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Checkout Persistence Sequence                          │
//! │                                                                         │
//! │  1. insert_transaction()  → header, status 'pending'                    │
//! │  2. insert_items()        → line items                                  │
//! │  3. insert_payments()     → tender breakdown                            │
//! │  4. (voucher redeem - VoucherRepository)                                │
//! │  5. finalize()            → status 'pending' → 'completed'              │
//! │                                                                         │
//! │  Every insert is keyed by a client-generated UUID and uses              │
//! │  ON CONFLICT DO NOTHING, so re-running the sequence after a failure     │
//! │  skips the steps that already applied instead of double-writing.        │
//! │  Readers that filter on status = 'completed' never observe a            │
//! │  partially-written sale.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::repository::parse_money;
use meridian_core::{Transaction, TransactionItem, TransactionPayment, TransactionStatus};

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Inserts a transaction header.
    ///
    /// Idempotent on the transaction id: re-inserting an already-applied
    /// header is a no-op.
    ///
    /// ## Returns
    /// - `Ok(true)` - header written
    /// - `Ok(false)` - header with this id already existed (retry resume)
    pub async fn insert_transaction(&self, txn: &Transaction) -> StoreResult<bool> {
        debug!(id = %txn.id, number = %txn.transaction_number, "Inserting transaction");

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (
                id, transaction_number, customer_name, customer_phone, customer_email,
                status, subtotal, tax, discount, total, notes, created_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&txn.id)
        .bind(&txn.transaction_number)
        .bind(&txn.customer_name)
        .bind(&txn.customer_phone)
        .bind(&txn.customer_email)
        .bind(txn.status)
        .bind(txn.subtotal.amount().to_string())
        .bind(txn.tax.amount().to_string())
        .bind(txn.discount.amount().to_string())
        .bind(txn.total.amount().to_string())
        .bind(&txn.notes)
        .bind(&txn.created_by)
        .bind(txn.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Bulk-inserts line items for a transaction.
    ///
    /// Idempotent per item id; already-applied items are skipped.
    pub async fn insert_items(&self, items: &[TransactionItem]) -> StoreResult<()> {
        for item in items {
            sqlx::query(
                r#"
                INSERT INTO transaction_items (
                    id, transaction_id, product_id, quantity, unit_price, subtotal, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(&item.id)
            .bind(&item.transaction_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price.amount().to_string())
            .bind(item.subtotal.amount().to_string())
            .bind(item.created_at)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// Bulk-inserts payments for a transaction.
    ///
    /// Idempotent per payment id; already-applied payments are skipped.
    pub async fn insert_payments(&self, payments: &[TransactionPayment]) -> StoreResult<()> {
        for payment in payments {
            debug!(
                transaction_id = %payment.transaction_id,
                method = payment.method.as_str(),
                amount = %payment.amount,
                "Recording payment"
            );

            sqlx::query(
                r#"
                INSERT INTO transaction_payments (
                    id, transaction_id, payment_method, amount, reference, voucher_id, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(&payment.id)
            .bind(&payment.transaction_id)
            .bind(payment.method)
            .bind(payment.amount.amount().to_string())
            .bind(&payment.reference)
            .bind(&payment.voucher_id)
            .bind(payment.created_at)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// Finalizes a transaction (pending → completed).
    ///
    /// Only completed transactions are visible to sales reporting, so this
    /// flip is what makes the whole sale observable as one unit.
    /// Idempotent: finalizing an already-completed transaction is a no-op.
    pub async fn finalize(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions SET status = 'completed'
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // distinguish "already completed" (retry resume) from "missing"
            let status: Option<TransactionStatus> =
                sqlx::query_scalar(r#"SELECT status FROM transactions WHERE id = ?1"#)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;

            return match status {
                Some(TransactionStatus::Completed) => Ok(()),
                Some(_) => Err(StoreError::not_found("Transaction (pending)", id)),
                None => Err(StoreError::not_found("Transaction", id)),
            };
        }

        Ok(())
    }

    /// Cancels a pending transaction.
    ///
    /// Used when the persistence saga aborts before finalization and the
    /// header should not linger as pending.
    pub async fn cancel(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions SET status = 'cancelled'
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Transaction (pending)", id));
        }

        Ok(())
    }

    /// Gets a transaction by ID.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, transaction_number, customer_name, customer_phone, customer_email,
                   status, subtotal, tax, discount, total, notes, created_by, created_at
            FROM transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_transaction).transpose()
    }

    /// Gets all items for a transaction.
    pub async fn get_items(&self, transaction_id: &str) -> StoreResult<Vec<TransactionItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, transaction_id, product_id, quantity, unit_price, subtotal, created_at
            FROM transaction_items
            WHERE transaction_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_item).collect()
    }

    /// Gets all payments for a transaction.
    pub async fn get_payments(
        &self,
        transaction_id: &str,
    ) -> StoreResult<Vec<TransactionPayment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, transaction_id, payment_method, amount, reference, voucher_id, created_at
            FROM transaction_payments
            WHERE transaction_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_payment).collect()
    }
}

/// Maps a database row to a Transaction.
fn map_transaction(row: &SqliteRow) -> StoreResult<Transaction> {
    Ok(Transaction {
        id: row.try_get("id")?,
        transaction_number: row.try_get("transaction_number")?,
        customer_name: row.try_get("customer_name")?,
        customer_phone: row.try_get("customer_phone")?,
        customer_email: row.try_get("customer_email")?,
        status: row.try_get("status")?,
        subtotal: parse_money(&row.try_get::<String, _>("subtotal")?, "subtotal")?,
        tax: parse_money(&row.try_get::<String, _>("tax")?, "tax")?,
        discount: parse_money(&row.try_get::<String, _>("discount")?, "discount")?,
        total: parse_money(&row.try_get::<String, _>("total")?, "total")?,
        notes: row.try_get("notes")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

/// Maps a database row to a TransactionItem.
fn map_item(row: &SqliteRow) -> StoreResult<TransactionItem> {
    Ok(TransactionItem {
        id: row.try_get("id")?,
        transaction_id: row.try_get("transaction_id")?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
        unit_price: parse_money(&row.try_get::<String, _>("unit_price")?, "unit_price")?,
        subtotal: parse_money(&row.try_get::<String, _>("subtotal")?, "subtotal")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

/// Maps a database row to a TransactionPayment.
fn map_payment(row: &SqliteRow) -> StoreResult<TransactionPayment> {
    Ok(TransactionPayment {
        id: row.try_get("id")?,
        transaction_id: row.try_get("transaction_id")?,
        method: row.try_get("payment_method")?,
        amount: parse_money(&row.try_get::<String, _>("amount")?, "amount")?,
        reference: row.try_get("reference")?,
        voucher_id: row.try_get("voucher_id")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
