//! # Domain Types
//!
//! Core domain types used throughout Meridian POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌────────────────────┐   │
//! │  │    Product      │   │   Transaction    │   │ TransactionPayment │   │
//! │  │  ─────────────  │   │  ──────────────  │   │  ────────────────  │   │
//! │  │  id (UUID)      │   │  id (UUID)       │   │  id (UUID)         │   │
//! │  │  barcode        │   │  transaction_    │   │  transaction_id    │   │
//! │  │  name           │   │     number       │   │  method            │   │
//! │  │  unit_price     │   │  subtotal/tax/   │   │  amount            │   │
//! │  └─────────────────┘   │  discount/total  │   └────────────────────┘   │
//! │                        └──────────────────┘                             │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌────────────────────┐   │
//! │  │    Voucher      │   │ TransactionItem  │   │   PaymentMethod    │   │
//! │  │  ─────────────  │   │  ──────────────  │   │  ────────────────  │   │
//! │  │  code (unique)  │   │  product_id      │   │  Cash / Card /     │   │
//! │  │  value          │   │  quantity        │   │  MobileMoney /     │   │
//! │  │  is_percentage  │   │  unit_price      │   │  BankTransfer /    │   │
//! │  │  uses_count     │   │  subtotal        │   │  Voucher           │   │
//! │  └─────────────────┘   └──────────────────┘   └────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (barcode, voucher code, transaction_number) - human-readable

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 750 bps = 7.5%. Basis points are exact integers, so the configured rate
/// survives storage and transport without floating-point drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (e.g., `7.5` for 7.5%).
    ///
    /// Returns `None` for negative percentages or values above 100%.
    pub fn from_percent(pct: Decimal) -> Option<Self> {
        if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
            return None;
        }
        (pct * Decimal::ONE_HUNDRED).round().to_u32().map(TaxRate)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact decimal fraction (750 bps → 0.075).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Carts take an immutable snapshot of `name` and `unit_price` at add-time;
/// later catalog changes do not affect open carts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    /// Unit price (non-negative).
    pub unit_price: Money,

    /// Barcode (EAN-13, UPC-A, etc.). Unique when present.
    pub barcode: Option<String>,

    /// Stock Keeping Unit - optional business identifier.
    pub sku: Option<String>,

    /// Optional category for reporting.
    pub category: Option<String>,

    /// Cost price (for margin reporting, not used by checkout math).
    pub cost_price: Option<Money>,

    /// Whether product is sellable (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Voucher
// =============================================================================

/// A discount voucher.
///
/// ## Lifecycle
/// Created by a privileged user, redeemed by completed transactions
/// (`uses_count` increments exactly once per transaction that applies it),
/// and deactivated explicitly or implicitly once expired or use-capped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voucher {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Redemption code - unique, stored normalized to upper-case.
    pub code: String,

    /// Optional operator-facing description.
    pub description: Option<String>,

    /// Discount value: a percentage (0-100) when `is_percentage`,
    /// otherwise a fixed monetary amount.
    pub value: Decimal,

    /// Whether `value` is a percentage of the subtotal.
    pub is_percentage: bool,

    /// Minimum cart subtotal required to redeem.
    pub min_purchase: Money,

    /// Optional cap on total redemptions.
    pub max_uses: Option<i64>,

    /// Redemptions so far.
    pub uses_count: i64,

    /// Optional expiry timestamp.
    pub expires_at: Option<DateTime<Utc>>,

    /// Whether the voucher can currently be applied.
    pub is_active: bool,

    /// User who created the voucher.
    pub created_by: String,

    /// When the voucher was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Transaction Status
// =============================================================================

/// The status of a sale transaction.
///
/// Checkout persists the header as `Pending` and flips it to `Completed` as
/// the final step, so readers that filter on `Completed` never observe a
/// partially-written transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Header written, finalization not yet reached.
    Pending,
    /// Sale finalized and payable.
    Completed,
    /// Sale abandoned before finalization.
    Cancelled,
    /// Sale reversed after completion.
    Refunded,
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Pending
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// Recognized tender types for transaction payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Mobile money transfer.
    MobileMoney,
    /// Direct bank transfer.
    BankTransfer,
    /// Redemption of a stored-value voucher as tender.
    Voucher,
}

impl PaymentMethod {
    /// Wire/database representation (snake_case tag).
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::MobileMoney => "mobile_money",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Voucher => "voucher",
        }
    }
}

// =============================================================================
// Roles
// =============================================================================

/// Application roles as granted in the user-role store.
///
/// Which roles may run a checkout is configuration
/// (see the checkout engine), never hard-coded against this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Cashier,
    Viewer,
}

impl Role {
    /// Wire/database representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Cashier => "cashier",
            Role::Viewer => "viewer",
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A sale transaction header.
///
/// Immutable after completion; owns its items and payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Human-readable number, e.g. `TXN-1735689600000`.
    pub transaction_number: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub status: TransactionStatus,
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    /// Always `max(0, subtotal + tax - discount)` by construction.
    pub total: Money,
    pub notes: Option<String>,
    /// User who processed the sale.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Transaction Item
// =============================================================================

/// A line item in a persisted transaction.
/// Uses the snapshot pattern to freeze pricing at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionItem {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    /// Quantity sold (always positive).
    pub quantity: i64,
    /// Unit price at time of sale (frozen).
    pub unit_price: Money,
    /// Line subtotal (unit_price × quantity).
    pub subtotal: Money,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Transaction Payment
// =============================================================================

/// A payment towards a transaction.
/// A transaction can have multiple payments for split tender scenarios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPayment {
    pub id: String,
    pub transaction_id: String,
    pub method: PaymentMethod,
    /// Amount paid (always positive).
    pub amount: Money,
    /// External reference (card auth code, transfer id, etc.).
    pub reference: Option<String>,
    /// Voucher consumed when `method` is [`PaymentMethod::Voucher`].
    pub voucher_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
