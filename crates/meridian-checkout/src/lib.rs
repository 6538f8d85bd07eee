//! # meridian-checkout: Checkout Orchestration for Meridian POS
//!
//! The point-of-sale checkout engine: session state, validation, pricing,
//! authorization, saga-style persistence, and receipt emission.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Meridian POS Checkout Flow                          │
//! │                                                                         │
//! │  Operator UI / caller                                                   │
//! │       │                                                                 │
//! │       │  scan, apply voucher, tender                                    │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                meridian-checkout (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   CheckoutSession ──► CheckoutEngine::process()                 │   │
//! │  │   (cart + pending        │                                      │   │
//! │  │    voucher)              ├──► CheckoutStore  (persistence)      │   │
//! │  │                          ├──► AccessPolicy   (identity/roles)   │   │
//! │  │                          └──► ReceiptSink    (receipt out)      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                              │                                  │
//! │       ▼                              ▼                                  │
//! │  meridian-core                  meridian-store                          │
//! │  (cart/voucher/pricing math)    (SQLite repositories)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meridian_checkout::{
//!     CheckoutConfig, CheckoutEngine, CheckoutSession, PaymentEntry, TracingReceiptSink,
//!     StoreAccessPolicy,
//! };
//! use meridian_core::{Money, PaymentMethod};
//! use meridian_store::{Store, StoreConfig};
//!
//! let store = Store::connect(StoreConfig::new("./meridian.db")).await?;
//! let config = CheckoutConfig::load(&store).await?;
//! let access = StoreAccessPolicy::new(store.clone(), Some(operator_id));
//! let engine = CheckoutEngine::new(store, access, TracingReceiptSink, config);
//!
//! let mut session = CheckoutSession::new();
//! session.add_product(&product, 2)?;
//! engine.apply_voucher(&mut session, "WELCOME10").await?;
//!
//! let outcome = engine
//!     .process(session.to_request(vec![PaymentEntry {
//!         method: PaymentMethod::Cash,
//!         amount: Money::from_major_minor(30, 0),
//!     }]))
//!     .await?;
//! session.reset();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod facade;
pub mod receipt;
pub mod session;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::{
    CheckoutConfig, CheckoutEngine, CheckoutOutcome, CheckoutRequest, PaymentEntry,
};
pub use error::{CheckoutError, PersistStep};
pub use facade::{AccessPolicy, CheckoutStore, StoreAccessPolicy};
pub use receipt::{Receipt, ReceiptError, ReceiptSink, TracingReceiptSink};
pub use session::{AppliedVoucher, CheckoutSession};
