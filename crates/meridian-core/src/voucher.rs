//! # Voucher Evaluation
//!
//! Pure eligibility rules and discount computation for vouchers.
//!
//! ## Evaluation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Voucher Evaluation                                   │
//! │                                                                         │
//! │  evaluate(voucher, subtotal, now)                                       │
//! │       │                                                                 │
//! │       ├── inactive? ───────────────► Err(NotFound)                      │
//! │       ├── expires_at <= now? ──────► Err(Expired)                       │
//! │       ├── uses_count >= max_uses? ─► Err(Exhausted)                     │
//! │       ├── subtotal < min_purchase? ► Err(MinimumPurchaseNotMet)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  percentage: subtotal × value / 100                                     │
//! │  fixed:      value                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ok(VoucherDiscount { code, voucher_id, amount })                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read-Only By Design
//! Evaluation NEVER mutates `uses_count`. The usage increment happens only
//! when a transaction completes, as a conditional write at the store. A
//! cashier can press "apply" any number of times before checkout without
//! double-counting a redemption.
//!
//! The discount is NOT clamped to the subtotal here; the pricing step floors
//! the final total at zero instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VoucherError;
use crate::money::Money;
use crate::types::Voucher;

/// A successfully evaluated discount, ready to feed into pricing and - on
/// completion - the usage increment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherDiscount {
    /// Normalized voucher code, kept for the usage increment at completion.
    pub code: String,

    /// Voucher id, recorded on voucher-tender payment rows.
    pub voucher_id: String,

    /// Computed discount amount (full precision).
    pub amount: Money,
}

/// Evaluates a voucher against the current subtotal at a point in time.
///
/// Deterministic and side-effect free: identical inputs always produce
/// identical output. The caller resolves the code to a `Voucher` first;
/// a lookup miss maps to [`VoucherError::NotFound`] with the same shape
/// an inactive voucher produces, so callers cannot distinguish (and leak)
/// which codes exist.
pub fn evaluate(
    voucher: &Voucher,
    subtotal: Money,
    now: DateTime<Utc>,
) -> Result<VoucherDiscount, VoucherError> {
    if !voucher.is_active {
        return Err(VoucherError::NotFound {
            code: voucher.code.clone(),
        });
    }

    if let Some(expires_at) = voucher.expires_at {
        if expires_at <= now {
            return Err(VoucherError::Expired {
                code: voucher.code.clone(),
            });
        }
    }

    if let Some(max_uses) = voucher.max_uses {
        if voucher.uses_count >= max_uses {
            return Err(VoucherError::Exhausted {
                code: voucher.code.clone(),
            });
        }
    }

    if subtotal < voucher.min_purchase {
        return Err(VoucherError::MinimumPurchaseNotMet {
            required: voucher.min_purchase,
            subtotal,
        });
    }

    let amount = if voucher.is_percentage {
        subtotal.percent_of(voucher.value)
    } else {
        Money::new(voucher.value)
    };

    Ok(VoucherDiscount {
        code: voucher.code.clone(),
        voucher_id: voucher.id.clone(),
        amount,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn voucher() -> Voucher {
        Voucher {
            id: "v-1".to_string(),
            code: "WELCOME10".to_string(),
            description: None,
            value: dec!(10),
            is_percentage: true,
            min_purchase: Money::from_major_minor(20, 0),
            max_uses: Some(100),
            uses_count: 0,
            expires_at: None,
            is_active: true,
            created_by: "admin-1".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_percentage_discount() {
        let result = evaluate(&voucher(), Money::from_major_minor(25, 0), Utc::now()).unwrap();
        assert_eq!(result.amount, Money::from_major_minor(2, 50));
        assert_eq!(result.code, "WELCOME10");
        assert_eq!(result.voucher_id, "v-1");
    }

    #[test]
    fn test_fixed_discount() {
        let mut v = voucher();
        v.is_percentage = false;
        v.value = dec!(5);

        let result = evaluate(&v, Money::from_major_minor(25, 0), Utc::now()).unwrap();
        assert_eq!(result.amount, Money::from_major_minor(5, 0));
    }

    #[test]
    fn test_inactive_rejected_as_not_found() {
        let mut v = voucher();
        v.is_active = false;

        assert_eq!(
            evaluate(&v, Money::from_major_minor(25, 0), Utc::now()),
            Err(VoucherError::NotFound {
                code: "WELCOME10".to_string()
            })
        );
    }

    #[test]
    fn test_expired_rejected() {
        let mut v = voucher();
        let now = Utc::now();
        v.expires_at = Some(now - Duration::hours(1));

        assert!(matches!(
            evaluate(&v, Money::from_major_minor(25, 0), now),
            Err(VoucherError::Expired { .. })
        ));

        // expiry exactly at `now` also rejects
        v.expires_at = Some(now);
        assert!(matches!(
            evaluate(&v, Money::from_major_minor(25, 0), now),
            Err(VoucherError::Expired { .. })
        ));
    }

    #[test]
    fn test_exhausted_rejected() {
        let mut v = voucher();
        v.max_uses = Some(3);
        v.uses_count = 3;

        assert!(matches!(
            evaluate(&v, Money::from_major_minor(25, 0), Utc::now()),
            Err(VoucherError::Exhausted { .. })
        ));
    }

    #[test]
    fn test_minimum_purchase_carries_required_amount() {
        let mut v = voucher();
        v.min_purchase = Money::from_major_minor(30, 0);

        let err = evaluate(&v, Money::from_major_minor(25, 0), Utc::now()).unwrap_err();
        assert_eq!(
            err,
            VoucherError::MinimumPurchaseNotMet {
                required: Money::from_major_minor(30, 0),
                subtotal: Money::from_major_minor(25, 0),
            }
        );
    }

    #[test]
    fn test_evaluation_is_pure_and_deterministic() {
        let v = voucher();
        let now = Utc::now();
        let subtotal = Money::from_major_minor(25, 0);

        let first = evaluate(&v, subtotal, now).unwrap();
        let second = evaluate(&v, subtotal, now).unwrap();

        assert_eq!(first, second);
        // the voucher snapshot is untouched; in particular uses_count
        assert_eq!(v.uses_count, 0);
    }

    #[test]
    fn test_discount_may_exceed_subtotal() {
        // no clamping here; pricing floors the total at zero
        let mut v = voucher();
        v.is_percentage = false;
        v.value = dec!(500);
        v.min_purchase = Money::zero();

        let result = evaluate(&v, Money::from_major_minor(25, 0), Utc::now()).unwrap();
        assert_eq!(result.amount, Money::from_major_minor(500, 0));
    }
}
