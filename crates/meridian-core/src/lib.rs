//! # meridian-core: Pure Business Logic for Meridian POS
//!
//! This crate is the **heart** of the Meridian checkout engine. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Meridian POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  meridian-checkout (orchestration)              │   │
//! │  │    CheckoutSession ──► CheckoutEngine ──► Receipt emission      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ meridian-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │ voucher │ │ pricing │  │   │
//! │  │   │ Product │ │  Money  │ │  Cart   │ │ rules   │ │ totals  │  │   │
//! │  │   │ Voucher │ │ TaxRate │ │CartLine │ │discount │ │  math   │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  meridian-store (persistence)                   │   │
//! │  │           SQLite queries, migrations, repositories              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Voucher, Transaction, etc.)
//! - [`money`] - Money type backed by exact decimal arithmetic
//! - [`cart`] - Cart and line-entry operations
//! - [`catalog`] - In-memory index of active sellable products
//! - [`voucher`] - Voucher eligibility evaluation and discount computation
//! - [`pricing`] - Subtotal / tax / discount / total derivation
//! - [`currency`] - Currency symbol lookup and display formatting
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Decimal Money**: All monetary values are `rust_decimal` decimals; full
//!    precision internally, rounding to 2 fractional digits only at presentation
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use meridian_core::money::Money;
//! use meridian_core::types::TaxRate;
//! use meridian_core::pricing;
//!
//! // A $25.00 cart taxed at 7.5%
//! let subtotal = Money::from_major_minor(25, 0);
//! let rate = TaxRate::from_bps(750); // 7.5%
//!
//! let totals = pricing::price(subtotal, rate, Money::zero());
//! // Tax keeps full precision internally (1.875); display rounds to 1.88
//! assert_eq!(totals.tax.to_display_string(), "1.88");
//! assert_eq!(totals.total.to_display_string(), "26.88");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod currency;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod voucher;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use meridian_core::Money` instead of
// `use meridian_core::money::Money`

pub use cart::{Cart, CartLine};
pub use catalog::CatalogIndex;
pub use error::{CartError, ValidationError, VoucherError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum unique line entries allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
/// Can be made configurable per-store in future versions.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line entry in a cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
/// Configurable per-store in future versions.
pub const MAX_LINE_QUANTITY: i64 = 999;
