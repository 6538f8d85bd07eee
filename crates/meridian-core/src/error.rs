//! # Error Types
//!
//! Domain-specific error types for meridian-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meridian-core errors (this file)                                       │
//! │  ├── ValidationError  - Input validation failures                       │
//! │  ├── CartError        - Cart capacity violations                        │
//! │  └── VoucherError     - Voucher eligibility failures                    │
//! │                                                                         │
//! │  meridian-store errors (separate crate)                                 │
//! │  └── StoreError       - Persistence operation failures                  │
//! │                                                                         │
//! │  meridian-checkout errors (separate crate)                              │
//! │  └── CheckoutError    - What the caller of a checkout attempt sees      │
//! │                                                                         │
//! │  Flow: ValidationError / VoucherError → CheckoutError → caller message  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, required minimum, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A collection that must have entries is empty.
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid phone number, invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Cart Error
// =============================================================================

/// Cart capacity violations.
///
/// Within the capacity bounds, cart operations with valid positive
/// quantities never fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Cart has reached its maximum number of unique line entries.
    #[error("Cart cannot have more than {max} line entries")]
    TooManyLines { max: usize },

    /// A single line's quantity would exceed the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },
}

// =============================================================================
// Voucher Error
// =============================================================================

/// Voucher eligibility failures.
///
/// ## When These Occur
/// Evaluation runs twice per sale: at apply time (cashier feedback) and again
/// at checkout time against the recomputed subtotal, because cart contents
/// can change between apply and checkout. [`VoucherError::Exhausted`] can
/// additionally surface from the persistence step when a concurrent
/// redemption consumes the last use between evaluation and the conditional
/// usage increment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoucherError {
    /// No active voucher exists for the code.
    #[error("Voucher not found: {code}")]
    NotFound { code: String },

    /// The voucher's expiry timestamp has passed.
    #[error("Voucher {code} has expired")]
    Expired { code: String },

    /// The voucher has reached its maximum number of uses.
    #[error("Voucher {code} has reached maximum uses")]
    Exhausted { code: String },

    /// Cart subtotal is below the voucher's minimum purchase threshold.
    #[error("Minimum purchase of {required} required, cart subtotal is {subtotal}")]
    MinimumPurchaseNotMet { required: Money, subtotal: Money },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
