//! # Validation Module
//!
//! Boundary validation for checkout submissions.
//!
//! ## Validation Strategy
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                 │
//! │                                                                        │
//! │  Layer 1: Boundary (this module)                                       │
//! │  ├── Cart shape: non-empty, sane quantities                            │
//! │  └── Field formats: phone, coupon code, UUIDs                          │
//! │           │                                                            │
//! │           ▼                                                            │
//! │  Layer 2: Advisory reads (lapak-db, pre-commit)                        │
//! │  └── Product exists / published / owned by the seller                  │
//! │           │                                                            │
//! │           ▼                                                            │
//! │  Layer 3: Atomic commit (lapak-db, authoritative)                      │
//! │  ├── stock ≥ quantity re-checked inside the decrement                  │
//! │  ├── used_count < usage_limit re-checked inside the redemption         │
//! │  └── UNIQUE / FK / CHECK constraints                                   │
//! │                                                                        │
//! │  Defense in depth: the early layers give precise errors fast; the      │
//! │  commit layer is the one that cannot be raced.                         │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CheckoutError, ValidationError};
use crate::types::CartLine;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates the shape of a submitted cart.
///
/// ## Rules
/// - Must not be empty (`EmptyCart`)
/// - Must not exceed `MAX_CART_LINES` unique lines
/// - Every product id must be a well-formed UUID
/// - Every line quantity must be in `[1, MAX_LINE_QUANTITY]`
/// - Every unit price must be in `[0, MAX_UNIT_PRICE_CENTS]`
///
/// The quantity and price bounds keep every subtotal far inside i64, so the
/// pricing math downstream cannot overflow.
///
/// Any violation aborts the whole checkout; there is no partial submission
/// of only the valid lines.
pub fn validate_cart(lines: &[CartLine]) -> Result<(), CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    if lines.len() > MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 1,
            max: MAX_CART_LINES as i64,
        }
        .into());
    }

    for line in lines {
        validate_uuid(&line.product_id)?;
        validate_quantity(line.quantity)?;
        if !(0..=MAX_UNIT_PRICE_CENTS).contains(&line.unit_price_cents) {
            return Err(ValidationError::OutOfRange {
                field: "unit price".to_string(),
                min: 0,
                max: MAX_UNIT_PRICE_CENTS,
            }
            .into());
        }
    }

    Ok(())
}

/// Validates a line quantity.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
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

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer phone number.
///
/// ## Rules
/// - Empty (after trimming) is allowed: walk-in order, no customer link
/// - At most 32 characters
/// - Digits with optional leading `+`
///
/// ## Returns
/// The trimmed phone, or `None` when empty.
pub fn validate_phone(phone: &str) -> ValidationResult<Option<String>> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Ok(None);
    }

    if phone.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: 32,
        });
    }

    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, optionally prefixed with +".to_string(),
        });
    }

    Ok(Some(phone.to_string()))
}

/// Validates a coupon code as typed by the operator.
///
/// ## Returns
/// The trimmed code.
pub fn validate_coupon_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "coupon code".to_string(),
        });
    }

    if code.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "coupon code".to_string(),
            max: 64,
        });
    }

    Ok(code.to_string())
}

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn line(qty: i64) -> CartLine {
        CartLine {
            product_id: PRODUCT_ID.to_string(),
            quantity: qty,
            unit_price_cents: 1_000,
        }
    }

    #[test]
    fn test_validate_cart_empty() {
        assert_eq!(validate_cart(&[]).unwrap_err(), CheckoutError::EmptyCart);
    }

    #[test]
    fn test_validate_cart_quantities() {
        assert!(validate_cart(&[line(1)]).is_ok());
        assert!(validate_cart(&[line(0)]).is_err());
        assert!(validate_cart(&[line(-5)]).is_err());
        assert!(validate_cart(&[line(1), line(MAX_LINE_QUANTITY + 1)]).is_err());
    }

    #[test]
    fn test_validate_cart_price_bounds() {
        let mut l = line(1);
        l.unit_price_cents = MAX_UNIT_PRICE_CENTS;
        assert!(validate_cart(&[l]).is_ok());

        let mut l = line(1);
        l.unit_price_cents = -1;
        assert!(validate_cart(&[l]).is_err());

        // A price this large would overflow the subtotal math if it ever got
        // past the boundary
        let mut l = line(3);
        l.unit_price_cents = i64::MAX / 2;
        assert!(matches!(
            validate_cart(&[l]).unwrap_err(),
            CheckoutError::Validation(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_cart_rejects_malformed_product_id() {
        let mut l = line(1);
        l.product_id = "not-a-uuid".to_string();
        assert!(matches!(
            validate_cart(&[l]).unwrap_err(),
            CheckoutError::Validation(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_phone() {
        assert_eq!(validate_phone("").unwrap(), None);
        assert_eq!(validate_phone("   ").unwrap(), None);
        assert_eq!(
            validate_phone("+628123456789").unwrap(),
            Some("+628123456789".to_string())
        );
        assert!(validate_phone("not-a-phone").is_err());
        assert!(validate_phone(&"1".repeat(40)).is_err());
    }

    #[test]
    fn test_validate_coupon_code() {
        assert_eq!(validate_coupon_code(" SALE10 ").unwrap(), "SALE10");
        assert!(validate_coupon_code("").is_err());
        assert!(validate_coupon_code(&"X".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
