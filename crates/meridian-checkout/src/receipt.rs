//! # Receipt Emission
//!
//! The receipt payload handed to an external rendering/printing collaborator.
//!
//! Emission is fire-and-forget relative to transaction success: a completed
//! sale stands even if the printer is offline. The engine reports a failed
//! emission on the success outcome instead of failing the checkout.
//!
//! Rendering (HTML layout, ESC/POS bytes, ...) is the collaborator's job;
//! this module only shapes the data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use meridian_core::{Cart, Money, Transaction, TransactionPayment};

// =============================================================================
// Payload
// =============================================================================

/// One product line on the receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// One tender line on the receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptPaymentLine {
    /// snake_case method tag (`cash`, `mobile_money`, ...).
    pub method: String,
    pub amount: Money,
}

/// The full receipt payload: header, lines, payment breakdown, and the
/// currency symbol the renderer should prefix amounts with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_number: String,
    pub timestamp: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub currency_symbol: String,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
    pub payments: Vec<ReceiptPaymentLine>,
    /// Overpayment returned to the customer (zero when paid exactly or under).
    pub change_due: Money,
}

impl Receipt {
    /// Builds a receipt from the completed transaction and the cart snapshot
    /// it was priced from (the cart carries the display names; persisted
    /// items only reference product ids).
    pub fn build(
        transaction: &Transaction,
        cart: &Cart,
        payments: &[TransactionPayment],
        currency_symbol: &str,
        change_due: Money,
    ) -> Self {
        Receipt {
            transaction_number: transaction.transaction_number.clone(),
            timestamp: transaction.created_at,
            customer_name: transaction.customer_name.clone(),
            currency_symbol: currency_symbol.to_string(),
            lines: cart
                .lines
                .iter()
                .map(|line| ReceiptLine {
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    line_total: line.line_total(),
                })
                .collect(),
            subtotal: transaction.subtotal,
            tax: transaction.tax,
            discount: transaction.discount,
            total: transaction.total,
            payments: payments
                .iter()
                .map(|p| ReceiptPaymentLine {
                    method: p.method.as_str().to_string(),
                    amount: p.amount,
                })
                .collect(),
            change_due,
        }
    }
}

// =============================================================================
// Sink
// =============================================================================

/// Receipt emission failed (printer offline, render error, ...).
///
/// Non-fatal by contract: the transaction stands.
#[derive(Debug, Clone, Error)]
#[error("Receipt emission failed: {0}")]
pub struct ReceiptError(pub String);

/// The external rendering/printing collaborator.
pub trait ReceiptSink {
    /// Hands the payload off for rendering. Implementations should return
    /// quickly; long print jobs belong behind a queue.
    fn emit(&self, receipt: &Receipt) -> Result<(), ReceiptError>;
}

/// Default sink that logs the receipt through `tracing`.
///
/// Useful for development and as a fallback when no printer is wired up.
#[derive(Debug, Clone, Default)]
pub struct TracingReceiptSink;

impl ReceiptSink for TracingReceiptSink {
    fn emit(&self, receipt: &Receipt) -> Result<(), ReceiptError> {
        let payload = serde_json::to_string(receipt).map_err(|e| ReceiptError(e.to_string()))?;
        info!(
            transaction_number = %receipt.transaction_number,
            lines = receipt.lines.len(),
            total = %receipt.total,
            payload = %payload,
            "Receipt emitted"
        );
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
