//! # Coupon Evaluation
//!
//! Pure coupon rule evaluation: validates a coupon against a cart and
//! computes the discount amount.
//!
//! ## Evaluation Order
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │  evaluate(coupon, lines, now)                                          │
//! │                                                                        │
//! │  1. status enabled?          ── no ──► CouponDisabled                  │
//! │  2. now ≥ valid_from?        ── no ──► CouponNotYetValid               │
//! │  3. now ≤ valid_to?          ── no ──► CouponExpired                   │
//! │  4. subtotal ≥ min_buy?      ── no ──► MinimumNotMet                   │
//! │  5. usage limit left?        ── no ──► UsageLimitReached               │
//! │  6. compute discount over the eligible base                            │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purity Boundary
//! This module is pure: it works on a coupon snapshot and an explicit `now`.
//! The usage-limit check here is advisory (it reads the snapshot's
//! `used_count`); the authoritative enforcement is the guarded `used_count`
//! increment that the persistence layer performs inside the checkout
//! transaction, so two concurrent redemptions of a limited coupon cannot
//! both pass.

use chrono::{DateTime, Utc};

use crate::error::CheckoutError;
use crate::money::Money;
use crate::types::{CartLine, Coupon, CouponStatus, DiscountType};

/// Validates `coupon` against the cart and computes the discount amount.
///
/// ## Arguments
/// * `coupon` - Snapshot of the coupon row (looked up by the caller)
/// * `lines` - The cart being priced
/// * `now` - Evaluation instant, passed explicitly for testability
///
/// ## Returns
/// The discount as Money, already clamped so it can never exceed the
/// discount base.
///
/// ## Discount Base
/// Normally the full cart subtotal. When the coupon restricts itself to
/// `eligible_product_ids`, only eligible lines contribute; the `min_buy`
/// threshold is still checked against the whole cart.
pub fn evaluate(
    coupon: &Coupon,
    lines: &[CartLine],
    now: DateTime<Utc>,
) -> Result<Money, CheckoutError> {
    if coupon.status == CouponStatus::Disabled {
        return Err(CheckoutError::CouponDisabled);
    }

    // Either bound may be absent, meaning unbounded on that side.
    if let Some(from) = coupon.valid_from {
        if now < from {
            return Err(CheckoutError::CouponNotYetValid);
        }
    }
    if let Some(to) = coupon.valid_to {
        if now > to {
            return Err(CheckoutError::CouponExpired);
        }
    }

    let subtotal: Money = lines.iter().map(|l| l.line_total()).sum();
    if subtotal < coupon.min_buy() {
        return Err(CheckoutError::MinimumNotMet {
            min_buy_cents: coupon.min_buy_cents,
            subtotal_cents: subtotal.cents(),
        });
    }

    if coupon.usage_limit > 0 && coupon.used_count >= coupon.usage_limit {
        return Err(CheckoutError::UsageLimitReached);
    }

    let base: Money = lines
        .iter()
        .filter(|l| coupon.applies_to(&l.product_id))
        .map(|l| l.line_total())
        .sum();

    compute_discount(coupon, base)
}

/// Computes the raw discount over `base` per the coupon's type.
fn compute_discount(coupon: &Coupon, base: Money) -> Result<Money, CheckoutError> {
    match coupon.discount_type {
        DiscountType::Percent => {
            // Authoring should enforce the range; re-checked here because a
            // corrupt value silently produces a wrong price.
            if !(0..=100).contains(&coupon.discount_value) {
                return Err(CheckoutError::Validation(
                    crate::error::ValidationError::OutOfRange {
                        field: "discount_value".to_string(),
                        min: 0,
                        max: 100,
                    },
                ));
            }
            Ok(base.percent(coupon.discount_value).min(base))
        }
        DiscountType::Amount => {
            // Same corrupt-row guard as the percent arm: a negative amount
            // would turn the discount into a surcharge.
            if coupon.discount_value < 0 {
                return Err(CheckoutError::Validation(
                    crate::error::ValidationError::MustBePositive {
                        field: "discount_value".to_string(),
                    },
                ));
            }
            Ok(Money::from_cents(coupon.discount_value).min(base))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn coupon(discount_type: DiscountType, value: i64) -> Coupon {
        Coupon {
            id: "c1".to_string(),
            seller_id: "s1".to_string(),
            code: "SALE10".to_string(),
            discount_type,
            discount_value: value,
            min_buy_cents: 0,
            usage_limit: 0,
            used_count: 0,
            valid_from: None,
            valid_to: None,
            status: CouponStatus::Enabled,
            eligible_product_ids: None,
            created_at: Utc::now(),
        }
    }

    fn line(product_id: &str, qty: i64, unit_price: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            quantity: qty,
            unit_price_cents: unit_price,
        }
    }

    #[test]
    fn test_percent_discount() {
        let mut c = coupon(DiscountType::Percent, 10);
        c.min_buy_cents = 50_000;

        let lines = vec![line("p1", 2, 50_000)];
        let discount = evaluate(&c, &lines, Utc::now()).unwrap();
        assert_eq!(discount.cents(), 10_000);
    }

    #[test]
    fn test_minimum_not_met() {
        let mut c = coupon(DiscountType::Percent, 10);
        c.min_buy_cents = 50_000;

        let lines = vec![line("p1", 1, 40_000)];
        let err = evaluate(&c, &lines, Utc::now()).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::MinimumNotMet {
                min_buy_cents: 50_000,
                subtotal_cents: 40_000
            }
        );
    }

    #[test]
    fn test_amount_discount_clamped_to_subtotal() {
        let c = coupon(DiscountType::Amount, 70_000);
        let lines = vec![line("p1", 1, 50_000)];

        let discount = evaluate(&c, &lines, Utc::now()).unwrap();
        assert_eq!(discount.cents(), 50_000);
    }

    #[test]
    fn test_disabled_coupon() {
        let mut c = coupon(DiscountType::Percent, 10);
        c.status = CouponStatus::Disabled;

        let lines = vec![line("p1", 1, 100_000)];
        assert_eq!(
            evaluate(&c, &lines, Utc::now()).unwrap_err(),
            CheckoutError::CouponDisabled
        );
    }

    #[test]
    fn test_validity_window() {
        let now = Utc::now();
        let lines = vec![line("p1", 1, 100_000)];

        let mut c = coupon(DiscountType::Percent, 10);
        c.valid_from = Some(now + Duration::hours(1));
        assert_eq!(
            evaluate(&c, &lines, now).unwrap_err(),
            CheckoutError::CouponNotYetValid
        );

        let mut c = coupon(DiscountType::Percent, 10);
        c.valid_to = Some(now - Duration::hours(1));
        assert_eq!(
            evaluate(&c, &lines, now).unwrap_err(),
            CheckoutError::CouponExpired
        );

        // Both bounds absent: always inside the window.
        let c = coupon(DiscountType::Percent, 10);
        assert!(evaluate(&c, &lines, now).is_ok());
    }

    #[test]
    fn test_usage_limit_reached() {
        let mut c = coupon(DiscountType::Percent, 10);
        c.usage_limit = 1;
        c.used_count = 1;

        let lines = vec![line("p1", 1, 100_000)];
        assert_eq!(
            evaluate(&c, &lines, Utc::now()).unwrap_err(),
            CheckoutError::UsageLimitReached
        );
    }

    #[test]
    fn test_zero_usage_limit_is_unlimited() {
        let mut c = coupon(DiscountType::Percent, 10);
        c.usage_limit = 0;
        c.used_count = 9_999;

        let lines = vec![line("p1", 1, 100_000)];
        assert!(evaluate(&c, &lines, Utc::now()).is_ok());
    }

    #[test]
    fn test_eligible_subset_restricts_base() {
        let mut c = coupon(DiscountType::Percent, 10);
        c.eligible_product_ids = Some(vec!["p1".to_string()]);

        let lines = vec![line("p1", 1, 50_000), line("p2", 1, 50_000)];
        let discount = evaluate(&c, &lines, Utc::now()).unwrap();
        // Base is only p1's 50,000, not the 100,000 cart subtotal.
        assert_eq!(discount.cents(), 5_000);
    }

    #[test]
    fn test_eligible_subset_matching_nothing_gives_zero() {
        let mut c = coupon(DiscountType::Amount, 10_000);
        c.eligible_product_ids = Some(vec!["other".to_string()]);

        let lines = vec![line("p1", 1, 50_000)];
        let discount = evaluate(&c, &lines, Utc::now()).unwrap();
        assert_eq!(discount, Money::zero());
    }

    #[test]
    fn test_percent_out_of_range_rejected() {
        let c = coupon(DiscountType::Percent, 150);
        let lines = vec![line("p1", 1, 100_000)];
        assert!(matches!(
            evaluate(&c, &lines, Utc::now()).unwrap_err(),
            CheckoutError::Validation(_)
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        // A negative flat value must never become a surcharge.
        let c = coupon(DiscountType::Amount, -5_000);
        let lines = vec![line("p1", 1, 100_000)];
        assert!(matches!(
            evaluate(&c, &lines, Utc::now()).unwrap_err(),
            CheckoutError::Validation(_)
        ));
    }
}
