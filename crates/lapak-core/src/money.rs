//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                            │
//! │                                                                        │
//! │  In floating point:                                                    │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                          │
//! │                                                                        │
//! │  A 10% coupon on 99,999 must not invent or lose a unit depending       │
//! │  on rounding mode.                                                     │
//! │                                                                        │
//! │  OUR SOLUTION: integer minor units (i64)                               │
//! │    Discounts round DOWN, so the merchant never over-discounts.         │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every monetary value in the engine flows through this type: product
//! prices, cart subtotals, coupon discounts, tendered amounts, and change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate results of subtraction may dip below
///   zero before being clamped; the type must represent that.
/// - **Single field tuple struct**: zero-cost abstraction over i64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity (line total = unit price × quantity).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns `pct` percent of this amount, rounding down.
    ///
    /// ## Why Round Down?
    /// Discount amounts always round in the merchant's favor; a 10% coupon
    /// on 99,999 yields 9,999, never 10,000.
    ///
    /// Uses i128 internally to prevent overflow on large amounts.
    pub fn percent(&self, pct: i64) -> Money {
        let cents = (self.0 as i128 * pct as i128) / 100;
        Money(cents as i64)
    }

    /// Subtracts `other`, clamping the result at zero.
    ///
    /// Used for the final total: a discount can never drive the amount
    /// the customer owes below zero.
    #[inline]
    pub fn sub_or_zero(&self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }

    /// Returns the smaller of two amounts.
    #[inline]
    pub fn min(self, other: Money) -> Money {
        Money(self.0.min(other.0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation for debugging and log output.
///
/// Formats as the raw minor-unit amount; UI formatting (currency symbol,
/// thousands separators, locale) is the presentation layer's job.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over line totals (cart subtotal).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_roundtrip() {
        let money = Money::from_cents(50_000);
        assert_eq!(money.cents(), 50_000);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(100_000);
        let b = Money::from_cents(40_000);

        assert_eq!((a + b).cents(), 140_000);
        assert_eq!((a - b).cents(), 60_000);
        assert_eq!((b * 3).cents(), 120_000);
    }

    #[test]
    fn test_percent_rounds_down() {
        assert_eq!(Money::from_cents(100_000).percent(10).cents(), 10_000);
        // 10% of 99,999 = 9,999.9 → 9,999
        assert_eq!(Money::from_cents(99_999).percent(10).cents(), 9_999);
        assert_eq!(Money::from_cents(100_000).percent(0).cents(), 0);
        assert_eq!(Money::from_cents(100_000).percent(100).cents(), 100_000);
    }

    #[test]
    fn test_sub_or_zero_clamps() {
        let subtotal = Money::from_cents(40_000);
        let discount = Money::from_cents(50_000);
        assert_eq!(subtotal.sub_or_zero(discount), Money::zero());
        assert_eq!(discount.sub_or_zero(subtotal).cents(), 10_000);
    }

    #[test]
    fn test_sum_of_line_totals() {
        let lines = vec![
            Money::from_cents(50_000).multiply_quantity(2),
            Money::from_cents(25_000).multiply_quantity(1),
        ];
        let subtotal: Money = lines.into_iter().sum();
        assert_eq!(subtotal.cents(), 125_000);
    }

    #[test]
    fn test_zero_and_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }
}
