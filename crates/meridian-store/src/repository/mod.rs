//! # Repository Module
//!
//! Database repository implementations for Meridian POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.   │
//! │                                                                         │
//! │  Checkout engine / caller                                               │
//! │       │                                                                 │
//! │       │  store.vouchers().find_active_by_code("WELCOME10")              │
//! │       ▼                                                                 │
//! │  VoucherRepository                                                      │
//! │  ├── find_active_by_code(&self, code)                                   │
//! │  ├── insert(&self, voucher)                                             │
//! │  └── redeem(&self, code)        ← single conditional UPDATE             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                         │
//! │  • SQL is isolated in one place                                         │
//! │  • Can swap database implementations                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog reads and product CRUD
//! - [`voucher::VoucherRepository`] - Voucher lookup and conditional redemption
//! - [`transaction::TransactionRepository`] - Transaction header/items/payments
//! - [`role::RoleRepository`] - Role grants and checks
//! - [`settings::SettingsRepository`] - Key/value application settings

pub mod product;
pub mod role;
pub mod settings;
pub mod transaction;
pub mod voucher;

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{StoreError, StoreResult};
use meridian_core::Money;

/// Parses a decimal column stored as TEXT.
///
/// Monetary columns are TEXT on purpose: REAL would reintroduce the
/// floating-point drift the decimal types exist to avoid.
pub(crate) fn parse_decimal(raw: &str, column: &str) -> StoreResult<Decimal> {
    Decimal::from_str(raw).map_err(|e| StoreError::Decode {
        column: column.to_string(),
        reason: e.to_string(),
    })
}

/// Parses a monetary column stored as TEXT.
pub(crate) fn parse_money(raw: &str, column: &str) -> StoreResult<Money> {
    parse_decimal(raw, column).map(Money::new)
}
