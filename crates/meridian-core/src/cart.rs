//! # Cart Module
//!
//! The mutable, ordered collection of line entries for an in-progress sale.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Operations                                  │
//! │                                                                         │
//! │  Cashier Action             Cart Method             State Change        │
//! │  ──────────────             ───────────             ────────────        │
//! │                                                                         │
//! │  Scan / click product ────► add() ────────────────► merge or push line  │
//! │                                                                         │
//! │  +/- quantity buttons ────► change_quantity() ────► qty += delta,       │
//! │                                                     drop line if <= 0   │
//! │                                                                         │
//! │  Click remove ────────────► remove() ─────────────► drop line           │
//! │                                                                         │
//! │  Complete sale / cancel ──► clear() ──────────────► empty cart          │
//! │                                                                         │
//! │  Order summary ───────────► subtotal() ───────────► (read only)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CartError;
use crate::money::Money;
use crate::types::Product;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// A line entry in the cart.
///
/// ## Design Notes
/// - `product_id`: Reference to the product (for the persisted line item)
/// - `name` / `unit_price`: Frozen copies taken at add-time. The cart keeps
///   displaying consistent data even if the catalog changes underneath it,
///   and a later price change never retroactively affects an open cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (UUID)
    pub product_id: String,

    /// Product name at time of adding (frozen)
    pub name: String,

    /// Unit price at time of adding (frozen)
    pub unit_price: Money,

    /// Quantity in cart (always positive)
    pub quantity: i64,

    /// When this line was first added to the cart
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a new cart line from a product and quantity,
    /// snapshotting the price at this moment.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Calculates the line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product merges quantity)
/// - Quantity is always > 0 (a change driving it to 0 or below removes the line)
/// - Maximum unique lines: [`MAX_CART_LINES`]
/// - Maximum quantity per line: [`MAX_LINE_QUANTITY`]
///
/// The cart is ephemeral: it belongs to one active checkout session and is
/// discarded on completion or explicit clear. It is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Line entries, in insertion order
    pub lines: Vec<CartLine>,

    /// When the cart was created/last cleared
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a product to the cart or increments quantity if already present.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity increases by `quantity`
    /// - Product not in cart: new line appended with a price snapshot
    ///
    /// Within the capacity bounds this never fails for a positive quantity.
    pub fn add(&mut self, product: &Product, quantity: i64) -> Result<(), CartError> {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id)
        {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(CartError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CartError::TooManyLines {
                max: MAX_CART_LINES,
            });
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CartError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Adjusts a line's quantity by a signed delta.
    ///
    /// ## Behavior
    /// - Resulting quantity <= 0: the line is removed
    /// - Unknown product id: no-op
    ///
    /// Removal this way is idempotent; driving the quantity further negative
    /// on an absent line changes nothing.
    pub fn change_quantity(&mut self, product_id: &str, delta: i64) {
        for line in &mut self.lines {
            if line.product_id == product_id {
                line.quantity += delta;
            }
        }
        self.lines.retain(|l| l.quantity > 0);
    }

    /// Removes a line from the cart unconditionally. No-op if absent.
    pub fn remove(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Returns the number of unique line entries.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Calculates the subtotal (before tax and discount). Pure, no side effects.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
