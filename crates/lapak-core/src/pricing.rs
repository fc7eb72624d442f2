//! # Pricing & Settlement
//!
//! Pure pricing math for a checkout: cart subtotal, manual discount bounds,
//! and the payment settlement (grand total, tendered amount, change).
//!
//! ## Pricing Flow
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │  subtotal = Σ(unit_price × quantity)                                   │
//! │       │                                                                │
//! │       ├── coupon code given ──► discount from coupon::evaluate         │
//! │       └── otherwise         ──► operator manual discount (bounded)     │
//! │       │                                                                │
//! │       ▼                                                                │
//! │  grand_total = max(0, subtotal − discount)                             │
//! │       │                                                                │
//! │       ├── cash      ──► tendered ≥ grand_total, change = difference    │
//! │       └── non-cash  ──► tendered = grand_total, change = 0             │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CheckoutError, ValidationError};
use crate::money::Money;
use crate::types::{CartLine, PaymentMethod};

/// The financial outcome of a priced checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub subtotal: Money,
    pub discount: Money,
    pub grand_total: Money,
    pub tendered: Money,
    pub change: Money,
}

/// Computes the cart subtotal: `Σ(unit_price × quantity)`.
pub fn cart_subtotal(lines: &[CartLine]) -> Money {
    lines.iter().map(|l| l.line_total()).sum()
}

/// Validates an operator-supplied manual discount.
///
/// ## Rules
/// - Never negative
/// - Never exceeds the subtotal
///
/// Out-of-bounds values are rejected rather than clamped: a bad manual
/// discount is an operator mistake the UI should surface, not silently fix.
pub fn manual_discount(manual_cents: i64, subtotal: Money) -> Result<Money, CheckoutError> {
    if manual_cents < 0 || manual_cents > subtotal.cents() {
        return Err(CheckoutError::Validation(ValidationError::OutOfRange {
            field: "manual_discount".to_string(),
            min: 0,
            max: subtotal.cents(),
        }));
    }
    Ok(Money::from_cents(manual_cents))
}

/// Settles payment for a priced cart.
///
/// For cash, the tendered amount must cover the grand total and the
/// difference is returned as change. For non-cash methods the tendered
/// amount is treated as exactly the grand total and change is zero.
pub fn settle(
    method: PaymentMethod,
    subtotal: Money,
    discount: Money,
    tendered_cents: i64,
) -> Result<Settlement, CheckoutError> {
    let grand_total = subtotal.sub_or_zero(discount);

    let (tendered, change) = if method.is_cash() {
        let tendered = Money::from_cents(tendered_cents);
        if tendered < grand_total {
            return Err(CheckoutError::PaymentInsufficient {
                required_cents: grand_total.cents(),
                tendered_cents,
            });
        }
        (tendered, tendered - grand_total)
    } else {
        (grand_total, Money::zero())
    };

    Ok(Settlement {
        subtotal,
        discount,
        grand_total,
        tendered,
        change,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(qty: i64, unit_price: i64) -> CartLine {
        CartLine {
            product_id: "p1".to_string(),
            quantity: qty,
            unit_price_cents: unit_price,
        }
    }

    #[test]
    fn test_cart_subtotal() {
        let lines = vec![line(2, 50_000), line(3, 10_000)];
        assert_eq!(cart_subtotal(&lines).cents(), 130_000);
        assert_eq!(cart_subtotal(&[]).cents(), 0);
    }

    #[test]
    fn test_cart_subtotal_at_boundary_limits_fits_i64() {
        // The largest cart the boundary validators admit: every line at the
        // quantity and price caps.
        let lines: Vec<CartLine> = (0..crate::MAX_CART_LINES)
            .map(|_| line(crate::MAX_LINE_QUANTITY, crate::MAX_UNIT_PRICE_CENTS))
            .collect();

        let expected =
            crate::MAX_CART_LINES as i64 * crate::MAX_LINE_QUANTITY * crate::MAX_UNIT_PRICE_CENTS;
        assert_eq!(cart_subtotal(&lines).cents(), expected);
    }

    #[test]
    fn test_cash_settlement_with_change() {
        // 2 × 50,000 cash with 120,000 tendered → 20,000 change.
        let subtotal = Money::from_cents(100_000);
        let s = settle(PaymentMethod::Cash, subtotal, Money::zero(), 120_000).unwrap();

        assert_eq!(s.grand_total.cents(), 100_000);
        assert_eq!(s.tendered.cents(), 120_000);
        assert_eq!(s.change.cents(), 20_000);
    }

    #[test]
    fn test_cash_insufficient() {
        let subtotal = Money::from_cents(100_000);
        let err = settle(PaymentMethod::Cash, subtotal, Money::zero(), 90_000).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::PaymentInsufficient {
                required_cents: 100_000,
                tendered_cents: 90_000
            }
        );
    }

    #[test]
    fn test_non_cash_ignores_tendered() {
        let subtotal = Money::from_cents(100_000);
        let discount = Money::from_cents(10_000);
        let s = settle(PaymentMethod::Card, subtotal, discount, 0).unwrap();

        assert_eq!(s.grand_total.cents(), 90_000);
        assert_eq!(s.tendered.cents(), 90_000);
        assert_eq!(s.change.cents(), 0);
    }

    #[test]
    fn test_discount_never_drives_total_negative() {
        let subtotal = Money::from_cents(40_000);
        let discount = Money::from_cents(50_000);
        let s = settle(PaymentMethod::Card, subtotal, discount, 0).unwrap();
        assert_eq!(s.grand_total, Money::zero());
    }

    #[test]
    fn test_manual_discount_bounds() {
        let subtotal = Money::from_cents(100_000);

        assert_eq!(manual_discount(0, subtotal).unwrap(), Money::zero());
        assert_eq!(
            manual_discount(100_000, subtotal).unwrap().cents(),
            100_000
        );
        assert!(manual_discount(-1, subtotal).is_err());
        assert!(manual_discount(100_001, subtotal).is_err());
    }

    #[test]
    fn test_settlement_invariant() {
        // subtotal − discount == grand_total for in-range discounts.
        let subtotal = Money::from_cents(100_000);
        let discount = Money::from_cents(10_000);
        let s = settle(PaymentMethod::WalletA, subtotal, discount, 0).unwrap();
        assert_eq!(s.subtotal - s.discount, s.grand_total);
    }
}
