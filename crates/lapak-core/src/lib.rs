//! # lapak-core: Pure Business Logic for the Lapak Checkout Engine
//!
//! This crate is the **heart** of the checkout engine. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │                     Lapak Checkout Architecture                        │
//! │                                                                        │
//! │  ┌────────────────────────────────────────────────────────────────┐   │
//! │  │              POS screen / back-office surface (external)       │   │
//! │  │        builds the cart, supplies the CheckoutRequest           │   │
//! │  └────────────────────────────┬───────────────────────────────────┘   │
//! │                               │                                        │
//! │  ┌────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lapak-core (THIS CRATE) ★                      │   │
//! │  │                                                                │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐         │   │
//! │  │   │  types   │ │  money   │ │  coupon  │ │ pricing  │         │   │
//! │  │   │ Product  │ │  Money   │ │ evaluate │ │ settle   │         │   │
//! │  │   │  Order   │ │          │ │          │ │          │         │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘         │   │
//! │  │                                                                │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │   │
//! │  └────────────────────────────┬───────────────────────────────────┘   │
//! │                               │                                        │
//! │  ┌────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  lapak-db (Persistence Layer)                  │   │
//! │  │     SQLite repositories, unit of work, CheckoutOrchestrator    │   │
//! │  └────────────────────────────────────────────────────────────────┘   │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Coupon, Order, boundary objects)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`coupon`] - Coupon rule evaluation and discount computation
//! - [`pricing`] - Subtotal, manual discount, and settlement math
//! - [`error`] - The typed checkout error taxonomy
//! - [`validation`] - Boundary input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output; `now` is a parameter
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are i64 minor units
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod coupon;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use lapak_core::Money` instead of
// `use lapak_core::money::Money`

pub use error::{CheckoutError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum unique lines allowed in a single checkout.
///
/// ## Business Reason
/// Prevents runaway carts and keeps one checkout transaction short-lived;
/// the commit phase holds the database write lock for its whole duration.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum unit price of a single line, in the smallest currency unit.
///
/// ## Business Reason
/// No real product costs a billion minor units; anything above this is a
/// client bug or hostile input. Together with `MAX_CART_LINES` and
/// `MAX_LINE_QUANTITY` it also bounds every subtotal to at most
/// `100 × 999 × 10^9 ≈ 10^14`, far inside i64, so cart arithmetic cannot
/// overflow.
pub const MAX_UNIT_PRICE_CENTS: i64 = 1_000_000_000;

/// How many times an order insert retries with a regenerated code after a
/// unique-constraint collision before giving up.
pub const ORDER_CODE_RETRIES: u32 = 3;
