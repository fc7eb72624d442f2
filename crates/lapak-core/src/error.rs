//! # Error Types
//!
//! Domain-specific error types for lapak-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                    │
//! │                                                                        │
//! │  lapak-core errors (this file)                                         │
//! │  ├── CheckoutError    - Why a checkout aborted (typed taxonomy)        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                        │
//! │  lapak-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                        │
//! │  Flow: ValidationError → CheckoutError ← DbError (as Persistence)      │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, amounts, limits)
//! 3. Errors are enum variants, never String
//! 4. Persistence failures stay generic outward; detail is logged internally

use thiserror::Error;

// =============================================================================
// Checkout Error
// =============================================================================

/// Why a checkout aborted.
///
/// Every variant aborts the entire checkout transaction; nothing partially
/// commits. Validation and coupon variants carry their precise reason so the
/// operator can correct the cart and resubmit. `Persistence` deliberately
/// carries no storage detail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The submitted cart contained no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// The product does not exist, is unpublished, or belongs to another
    /// seller. The three cases are indistinguishable on purpose: the
    /// operator only needs to know the line cannot be sold.
    #[error("product unavailable: {product_id}")]
    ProductUnavailable { product_id: String },

    /// More units requested than are in stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout (qty: 10)
    ///      │
    ///      ▼
    /// Atomic decrement finds available = 3
    ///      │
    ///      ▼
    /// InsufficientStock { product_id, available: 3, requested: 10 }
    ///      │
    ///      ▼
    /// Operator corrects the cart and resubmits
    /// ```
    #[error("insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Cash tendered is less than the grand total.
    #[error("payment insufficient: required {required_cents}, tendered {tendered_cents}")]
    PaymentInsufficient {
        required_cents: i64,
        tendered_cents: i64,
    },

    /// No coupon with that code exists for this seller.
    #[error("coupon not found")]
    CouponNotFound,

    /// The coupon exists but has been switched off.
    #[error("coupon is disabled")]
    CouponDisabled,

    /// The coupon's validity window has passed.
    #[error("coupon has expired")]
    CouponExpired,

    /// The coupon's validity window has not started yet.
    #[error("coupon is not yet valid")]
    CouponNotYetValid,

    /// The cart subtotal is below the coupon's minimum.
    #[error("minimum purchase not met: requires {min_buy_cents}, subtotal {subtotal_cents}")]
    MinimumNotMet {
        min_buy_cents: i64,
        subtotal_cents: i64,
    },

    /// The coupon's usage limit has been exhausted.
    #[error("coupon usage limit reached")]
    UsageLimitReached,

    /// Input validation failure (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Commit/transaction failure. Storage internals are logged, never
    /// surfaced to the caller.
    #[error("checkout could not be completed")]
    Persistence,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when the boundary request doesn't meet requirements, before
/// any business logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CheckoutError::InsufficientStock {
            product_id: "p2".to_string(),
            available: 3,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for p2: available 3, requested 10"
        );

        let err = CheckoutError::PaymentInsufficient {
            required_cents: 100_000,
            tendered_cents: 90_000,
        };
        assert_eq!(
            err.to_string(),
            "payment insufficient: required 100000, tendered 90000"
        );
    }

    #[test]
    fn test_persistence_message_is_generic() {
        // Storage internals must not leak to the caller.
        assert_eq!(
            CheckoutError::Persistence.to_string(),
            "checkout could not be completed"
        );
    }

    #[test]
    fn test_validation_converts_to_checkout_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let err: CheckoutError = validation_err.into();
        assert!(matches!(err, CheckoutError::Validation(_)));
    }
}
