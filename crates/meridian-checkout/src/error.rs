//! # Checkout Error Types
//!
//! The error taxonomy a checkout caller sees.
//!
//! ## Recovery Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Error                     Persisted?   Recovery                        │
//! │  ─────                     ──────────   ────────                        │
//! │  Validation                nothing      user corrects input, retries    │
//! │  NotAuthenticated /        nothing      sign in / switch user           │
//! │  NotAuthorized                                                          │
//! │  Voucher(..)               nothing*     remove/replace voucher, retry   │
//! │  PersistenceUnavailable    nothing      retry when the store is back    │
//! │  PartialCommit             PARTIAL      operator reconciles using the   │
//! │                                         logged transaction id           │
//! │                                                                         │
//! │  * Voucher(Exhausted) can also surface from the persistence step when   │
//! │    a concurrent redemption wins the race; the engine cancels the        │
//! │    pending header so the sale is never finalized with that discount.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Receipt emission failure is deliberately NOT in this enum: the sale
//! stands, so it is reported on the success outcome instead.

use std::fmt;
use thiserror::Error;

use meridian_core::{ValidationError, VoucherError};
use meridian_store::StoreError;

// =============================================================================
// Persistence Steps
// =============================================================================

/// The sequential steps of the checkout persistence saga.
///
/// Carried on [`CheckoutError::PartialCommit`] so an operator knows exactly
/// how far the attempt got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistStep {
    /// Transaction header insert (status pending).
    Header,
    /// Line item bulk insert.
    Items,
    /// Payment bulk insert.
    Payments,
    /// Conditional voucher usage increment.
    VoucherRedemption,
    /// Status flip pending → completed.
    Finalize,
}

impl fmt::Display for PersistStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PersistStep::Header => "header",
            PersistStep::Items => "items",
            PersistStep::Payments => "payments",
            PersistStep::VoucherRedemption => "voucher redemption",
            PersistStep::Finalize => "finalize",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Checkout Error
// =============================================================================

/// Errors a checkout attempt can fail with.
///
/// Every variant carries enough structure to render a precise user-facing
/// message; none are swallowed silently.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Bad cart or payment shape. Fully recoverable; nothing persisted.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No current user identity. Nothing persisted.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The current user holds none of the authorized roles. Nothing persisted.
    #[error("User {user_id} is not authorized to process transactions")]
    NotAuthorized { user_id: String },

    /// Voucher eligibility failed (at checkout re-validation, or at the
    /// redemption write for [`VoucherError::Exhausted`]).
    #[error(transparent)]
    Voucher(#[from] VoucherError),

    /// The store was unreachable or timed out before any write. Retryable.
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(#[source] StoreError),

    /// A write failed after an earlier write succeeded. Fatal to this
    /// attempt; the partially-written transaction id is logged and carried
    /// here so an operator can reconcile. Prior writes are not rolled back
    /// automatically.
    #[error("Checkout failed at {step} step, transaction {transaction_id} is partially written: {source}")]
    PartialCommit {
        transaction_id: String,
        step: PersistStep,
        #[source]
        source: StoreError,
    },
}

impl CheckoutError {
    /// True when nothing was persisted and the user can simply retry.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CheckoutError::PartialCommit { .. })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
