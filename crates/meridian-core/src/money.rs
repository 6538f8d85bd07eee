//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In IEEE-754 floating point:                                            │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Tax on a $25.00 cart at 7.5% is exactly $1.875 - three fractional     │
//! │  digits. Rounding that to cents BEFORE the total compounds error        │
//! │  across the tax and discount steps.                                     │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                             │
//! │    Internal amounts keep full precision (1.875 stays 1.875).            │
//! │    Rounding to 2 fractional digits happens ONLY at presentation.        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use meridian_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let price = Money::new(Decimal::new(1099, 2)); // 10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;                       // 21.98
//! let total = price + Money::from_major_minor(5, 0); // 15.99
//!
//! // NEVER do this:
//! // let bad = Money::from_f64(10.99); // NO SUCH METHOD EXISTS!
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value as an exact decimal.
///
/// ## Design Decisions
/// - **Decimal (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over `Decimal`
/// - **Full precision internally**: Only [`Money::rounded`] and the `Display`
///   impl collapse to 2 fractional digits
///
/// ## User Workflow Context
/// ```text
/// Product.unit_price ──► CartLine.unit_price ──► CartLine.line_total()
///                                                       │
/// Cart.subtotal() ──► tax / discount ──► Totals.total ──► Payment.amount
///
/// EVERY monetary value in the system flows through this type.
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value from an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from major and minor units (e.g., dollars and cents).
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::money::Money;
    ///
    /// let price = Money::from_major_minor(10, 99); // 10.99
    /// assert_eq!(price.to_display_string(), "10.99");
    ///
    /// let refund = Money::from_major_minor(-5, 50); // -5.50
    /// assert_eq!(refund.to_display_string(), "-5.50");
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -5.50, not -4.50
    pub fn from_major_minor(major: i64, minor: u32) -> Self {
        let minor = i64::from(minor);
        let cents = if major < 0 {
            major * 100 - minor
        } else {
            major * 100 + minor
        };
        Money(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal amount at full precision.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns the larger of two values.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    /// Rounds to 2 fractional digits for presentation.
    ///
    /// Midpoints round away from zero (24.375 → 24.38), matching how retail
    /// totals are shown on receipts. Internal arithmetic never calls this.
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Formats the amount with exactly 2 fractional digits, no symbol.
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let total = Money::new(Decimal::new(24375, 3)); // 24.375
    /// assert_eq!(total.to_display_string(), "24.38");
    /// ```
    pub fn to_display_string(&self) -> String {
        format!("{:.2}", self.rounded())
    }

    /// Calculates tax on this amount at the given rate.
    ///
    /// The result retains full precision: 25.00 at 7.5% is exactly 1.875.
    /// Rounding to cents is deferred to presentation.
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::money::Money;
    /// use meridian_core::types::TaxRate;
    /// use rust_decimal::Decimal;
    ///
    /// let subtotal = Money::from_major_minor(25, 0);
    /// let tax = subtotal.tax_at(TaxRate::from_bps(750)); // 7.5%
    /// assert_eq!(tax.amount(), Decimal::new(1875, 3));   // 1.875
    /// ```
    pub fn tax_at(&self, rate: TaxRate) -> Money {
        Money(self.0 * rate.fraction())
    }

    /// Computes a percentage of this amount (e.g., a 10% voucher discount).
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let subtotal = Money::from_major_minor(25, 0);
    /// let discount = subtotal.percent_of(Decimal::from(10));
    /// assert_eq!(discount, Money::from_major_minor(2, 50));
    /// ```
    pub fn percent_of(&self, percent: Decimal) -> Money {
        Money(self.0 * percent / Decimal::ONE_HUNDRED)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::money::Money;
    ///
    /// let unit_price = Money::from_major_minor(2, 99);
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.to_display_string(), "8.97");
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money rounded to 2 fractional digits.
///
/// ## Note
/// This is for receipts and debugging. Pair with a currency symbol via
/// [`crate::currency::format`] for user-facing display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Summation over iterators of Money (cart subtotals, payment totals).
impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl From<Decimal> for Money {
    #[inline]
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
