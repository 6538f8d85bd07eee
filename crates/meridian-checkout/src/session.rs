//! # Checkout Session
//!
//! The ephemeral state one operator accumulates between "first scan" and
//! "payment complete": the cart, a pending voucher discount, and optional
//! customer details.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Session                                   │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ Building │────►│  Tender  │────►│ Completed│       │
//! │  │          │     │   cart   │     │          │     │   sale   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                │                 │            │
//! │                   add_product      to_request()        reset()         │
//! │                   change_quantity  (snapshot for                       │
//! │                   apply_voucher     the engine)                        │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ───────────────────►  (back to empty;     │
//! │                                                    pending voucher     │
//! │                                                    is KEPT - see below)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Voucher Semantics
//! - Applying a second code overwrites the pending discount; discounts never
//!   stack.
//! - A failed apply leaves the previously applied discount untouched.
//! - Clearing or editing the cart does NOT clear a pending voucher. The
//!   engine re-validates the code against the recomputed subtotal at
//!   checkout, so a cart that shrank below the minimum purchase is caught
//!   there rather than silently keeping the discount.
//!
//! One session belongs to one interactive operator; there is no concurrent
//! mutation of a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{CheckoutRequest, PaymentEntry};
use meridian_core::{voucher, Cart, CartError, Money, Product, Voucher, VoucherError};

/// A voucher discount pending on the session, quoted at apply time.
///
/// The quote is display-only; checkout recomputes the discount from the
/// then-current subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedVoucher {
    /// Normalized code, forwarded to checkout for re-validation.
    pub code: String,
    /// Discount amount quoted against the subtotal at apply time.
    pub discount: Money,
}

/// In-progress checkout state for a single operator.
#[derive(Debug, Clone, Default)]
pub struct CheckoutSession {
    /// The cart being assembled.
    pub cart: Cart,

    voucher: Option<AppliedVoucher>,

    /// Optional customer details captured in the tender dialog.
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
}

impl CheckoutSession {
    /// Creates a fresh, empty session.
    pub fn new() -> Self {
        CheckoutSession {
            cart: Cart::new(),
            voucher: None,
            customer_name: None,
            customer_phone: None,
            customer_email: None,
        }
    }

    /// Adds a product to the cart (merge-on-duplicate).
    pub fn add_product(&mut self, product: &Product, quantity: i64) -> Result<(), CartError> {
        self.cart.add(product, quantity)
    }

    /// Adjusts a line quantity by a signed delta; <= 0 removes the line.
    pub fn change_quantity(&mut self, product_id: &str, delta: i64) {
        self.cart.change_quantity(product_id, delta);
    }

    /// Removes a line unconditionally.
    pub fn remove_product(&mut self, product_id: &str) {
        self.cart.remove(product_id);
    }

    /// Empties the cart. A pending voucher survives; checkout re-validates it.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Current cart subtotal.
    pub fn subtotal(&self) -> Money {
        self.cart.subtotal()
    }

    /// The pending voucher discount, if any.
    pub fn pending_voucher(&self) -> Option<&AppliedVoucher> {
        self.voucher.as_ref()
    }

    /// Drops the pending voucher (the "remove discount" action).
    pub fn remove_voucher(&mut self) {
        self.voucher = None;
    }

    /// Applies a voucher lookup result against the current subtotal.
    ///
    /// `lookup` is the store's answer for the normalized `code`; `None`
    /// (no active voucher) maps to [`VoucherError::NotFound`].
    ///
    /// ## Behavior
    /// - Success overwrites any previously pending discount (no stacking)
    /// - Failure leaves a previously pending discount untouched
    pub fn apply_voucher(
        &mut self,
        lookup: Option<&Voucher>,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Money, VoucherError> {
        let voucher = lookup.ok_or_else(|| VoucherError::NotFound {
            code: code.to_string(),
        })?;

        let discount = voucher::evaluate(voucher, self.cart.subtotal(), now)?;

        let amount = discount.amount;
        self.voucher = Some(AppliedVoucher {
            code: discount.code,
            discount: amount,
        });
        Ok(amount)
    }

    /// Snapshots the session into a checkout request with the given tender.
    pub fn to_request(&self, payments: Vec<PaymentEntry>) -> CheckoutRequest {
        CheckoutRequest {
            cart: self.cart.clone(),
            customer_name: self.customer_name.clone(),
            customer_phone: self.customer_phone.clone(),
            customer_email: self.customer_email.clone(),
            payments,
            voucher_code: self.voucher.as_ref().map(|v| v.code.clone()),
            notes: None,
        }
    }

    /// Resets everything after a completed sale (or an explicit cancel).
    pub fn reset(&mut self) {
        self.cart.clear();
        self.voucher = None;
        self.customer_name = None;
        self.customer_phone = None;
        self.customer_email = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
