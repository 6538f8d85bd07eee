//! # meridian-store: Persistence Layer for Meridian POS
//!
//! This crate provides database access for the Meridian POS system.
//! It uses SQLite for local storage with sqlx for async operations, and
//! stands in for the hosted backend the original deployment talks to.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Meridian POS Data Flow                            │
//! │                                                                         │
//! │  Checkout engine / back-office caller                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   meridian-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │     Store     │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ transaction.rs │    │  (embedded)  │  │   │
//! │  │   │               │    │ voucher.rs     │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ product.rs     │    │ 001_init.sql │  │   │
//! │  │   │ Management    │    │ role.rs        │    │ ...          │  │   │
//! │  │   │               │    │ settings.rs    │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL mode, foreign keys on)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meridian_store::{Store, StoreConfig};
//!
//! let store = Store::connect(StoreConfig::new("path/to/meridian.db")).await?;
//!
//! let products = store.products().list_active().await?;
//! let voucher = store.vouchers().find_active_by_code("WELCOME10").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Store, StoreConfig};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::role::RoleRepository;
pub use repository::settings::SettingsRepository;
pub use repository::transaction::TransactionRepository;
pub use repository::voucher::VoucherRepository;
