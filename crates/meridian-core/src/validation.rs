//! # Validation Module
//!
//! Input validation utilities for Meridian POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (UI / API boundary)                                    │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (business rule validation)                        │
//! │  ├── Runs again inside the checkout engine - the engine never           │
//! │  │   trusts a caller-validated payload                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database constraints                                          │
//! │  ├── NOT NULL / UNIQUE / CHECK / foreign keys                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::MAX_LINE_QUANTITY;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price on a checkout line.
///
/// ## Rules
/// - Must be strictly positive; a zero or negative snapshot means the cart
///   entry was assembled from bad catalog data and the sale must not proceed
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "unit price".to_string(),
        });
    }

    Ok(())
}

/// Validates a payment amount.
///
/// ## Rules
/// - Must be positive (> 0); zero-amount tender lines are dropped by the
///   caller before they reach checkout
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an optional customer name.
///
/// ## Rules
/// - Maximum 100 characters
/// - Whitespace-only input normalizes to `None`
///
/// ## Returns
/// The trimmed name, or `None` when absent/blank.
pub fn validate_customer_name(name: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: 100,
        });
    }

    Ok(Some(name.to_string()))
}

/// Validates an optional customer phone number.
///
/// ## Rules
/// - Maximum 20 characters
/// - Digits plus `+ - ( )` and spaces only
/// - Whitespace-only input normalizes to `None`
pub fn validate_customer_phone(phone: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    if phone.chars().count() > 20 {
        return Err(ValidationError::TooLong {
            field: "customer phone".to_string(),
            max: 20,
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "customer phone".to_string(),
            reason: "must contain only digits, spaces, and + - ( )".to_string(),
        });
    }

    Ok(Some(phone.to_string()))
}

/// Normalizes a voucher code for lookup.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Codes are case-insensitive; the canonical form is upper-case
///
/// ## Returns
/// The trimmed, upper-cased code.
pub fn normalize_voucher_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "voucher code".to_string(),
        });
    }

    Ok(code.to_uppercase())
}

/// Validates a UUID string format.
///
/// ## Rules
/// - Must be a valid UUID format
/// - 36 characters with hyphens: xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
///
/// Cart lines reference products by UUID; a malformed id means the payload
/// was assembled outside the catalog and must not reach persistence.
pub fn validate_uuid(id: &str, field: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Validates a catalog search query.
///
/// ## Rules
/// - Can be empty (returns no results rather than erroring)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(Money::from_major_minor(10, 99)).is_ok());
        assert!(validate_unit_price(Money::zero()).is_err());
        assert!(validate_unit_price(Money::from_major_minor(-1, 0)).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(Money::from_major_minor(15, 0)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
    }

    #[test]
    fn test_validate_customer_name() {
        assert_eq!(validate_customer_name(None).unwrap(), None);
        assert_eq!(validate_customer_name(Some("   ")).unwrap(), None);
        assert_eq!(
            validate_customer_name(Some("  Ada Lovelace ")).unwrap(),
            Some("Ada Lovelace".to_string())
        );
        assert!(validate_customer_name(Some(&"x".repeat(101))).is_err());
    }

    #[test]
    fn test_validate_customer_phone() {
        assert_eq!(validate_customer_phone(None).unwrap(), None);
        assert_eq!(
            validate_customer_phone(Some("+234 (0) 801-234-5678")).unwrap(),
            Some("+234 (0) 801-234-5678".to_string())
        );
        assert!(validate_customer_phone(Some("call me maybe")).is_err());
        assert!(validate_customer_phone(Some(&"1".repeat(21))).is_err());
    }

    #[test]
    fn test_normalize_voucher_code() {
        assert_eq!(normalize_voucher_code(" welcome10 ").unwrap(), "WELCOME10");
        assert!(normalize_voucher_code("   ").is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000", "product id").is_ok());
        assert!(validate_uuid("", "product id").is_err());
        assert!(validate_uuid("not-a-uuid", "product id").is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  cola  ").unwrap(), "cola");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }
}
