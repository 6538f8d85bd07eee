//! # Pricing Engine
//!
//! Derives subtotal / tax / discount / total for a sale.
//!
//! ## Order of Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Pricing Derivation                                  │
//! │                                                                         │
//! │  subtotal S (from the cart, full precision)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tax = S × rate                 ← tax applies to the PRE-discount       │
//! │       │                           subtotal                              │
//! │       ▼                                                                 │
//! │  total = max(0, S + tax − D)    ← floored at zero: a discount larger    │
//! │       │                           than subtotal + tax never produces    │
//! │       ▼                           a negative total                      │
//! │  Totals { subtotal, tax, discount, total }                              │
//! │                                                                         │
//! │  All intermediate values keep FULL decimal precision.                   │
//! │  Rounding to 2 fractional digits happens only at presentation           │
//! │  (Money::rounded / Display), never between steps.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration (the tax rate) is passed in per call. The pricing engine
//! holds no cached global state; the caller owns the refresh contract for
//! rates loaded from settings.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::TaxRate;

/// The priced breakdown of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    /// `max(0, subtotal + tax - discount)` - never negative.
    pub total: Money,
}

impl Totals {
    /// Amount still owed after payments; negative values are clamped by
    /// the caller when computing change due.
    pub fn balance_after(&self, paid: Money) -> Money {
        self.total - paid
    }
}

/// Prices a sale from subtotal, tax rate, and an already-resolved discount.
///
/// Pure function of its inputs.
///
/// ## Example
/// ```rust
/// use meridian_core::money::Money;
/// use meridian_core::pricing::price;
/// use meridian_core::types::TaxRate;
///
/// // 25.00 cart, 7.5% tax, 10%-off voucher already resolved to 2.50
/// let totals = price(
///     Money::from_major_minor(25, 0),
///     TaxRate::from_bps(750),
///     Money::from_major_minor(2, 50),
/// );
/// assert_eq!(totals.tax.to_display_string(), "1.88");     // exactly 1.875
/// assert_eq!(totals.total.to_display_string(), "24.38");  // exactly 24.375
/// ```
pub fn price(subtotal: Money, rate: TaxRate, discount: Money) -> Totals {
    let tax = subtotal.tax_at(rate);
    let total = Money::zero().max(subtotal + tax - discount);

    Totals {
        subtotal,
        tax,
        discount,
        total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
