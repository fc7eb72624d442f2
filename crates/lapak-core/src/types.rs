//! # Domain Types
//!
//! Core domain types for the checkout engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                   │
//! │                                                                        │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐         │
//! │  │    Product     │   │     Coupon     │   │    Customer    │         │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │         │
//! │  │  id (UUID)     │   │  code + rules  │   │  phone lookup  │         │
//! │  │  stock ≥ 0     │   │  used_count    │   │  lazy create   │         │
//! │  └────────────────┘   └────────────────┘   └────────────────┘         │
//! │                                                                        │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐         │
//! │  │     Order      │   │   OrderLine    │   │CouponRedemption│         │
//! │  │  code (unique) │   │  price frozen  │   │  limited-use   │         │
//! │  │  totals        │   │  at sale time  │   │  audit trail   │         │
//! │  └────────────────┘   └────────────────┘   └────────────────┘         │
//! │                                                                        │
//! │  Boundary objects: CartLine → CheckoutRequest → CheckoutResult        │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! Every persisted entity has a UUID v4 `id` used for relations; `Order`
//! additionally carries a human-readable `code` (unique, shown on receipts).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays at the counter.
///
/// Only `Cash` involves tendered-amount/change arithmetic; the electronic
/// methods are settled externally for exactly the grand total.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash handed to the operator.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// First supported e-wallet provider.
    WalletA,
    /// Second supported e-wallet provider.
    WalletB,
}

impl PaymentMethod {
    /// Whether this method requires tendered-amount handling.
    #[inline]
    pub const fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A sellable catalog entry owned by a seller.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Seller this product belongs to.
    pub seller_id: String,

    /// Display name.
    pub name: String,

    /// Unit price in the smallest currency unit.
    pub price_cents: i64,

    /// Units available for sale. Never negative.
    pub stock: i64,

    /// Cumulative units sold (incremented on every committed order line).
    pub sold_count: i64,

    /// Whether the product is visible/sellable.
    pub published: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether this product may appear in a checkout for `seller_id`.
    pub fn sellable_by(&self, seller_id: &str) -> bool {
        self.published && self.seller_id == seller_id
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// How a coupon's `discount_value` is interpreted.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` is a percentage of the discount base (0-100).
    Percent,
    /// `discount_value` is a flat amount in the smallest currency unit.
    Amount,
}

/// Whether a coupon is currently redeemable at all.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    Enabled,
    Disabled,
}

/// A seller-defined discount rule identified by a code.
///
/// Authoring (creation/editing) happens elsewhere; the checkout engine only
/// evaluates coupons at redemption time and increments `used_count` when an
/// order that applied one commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    pub seller_id: String,

    /// Redemption code the operator types in (unique per seller).
    pub code: String,

    pub discount_type: DiscountType,

    /// Percent (0-100) or flat amount, depending on `discount_type`.
    pub discount_value: i64,

    /// Minimum cart subtotal required to redeem.
    pub min_buy_cents: i64,

    /// Maximum number of redemptions. Zero means unlimited.
    pub usage_limit: i64,

    /// Redemptions so far. The only field this engine mutates.
    pub used_count: i64,

    /// Start of the validity window. `None` = unbounded.
    pub valid_from: Option<DateTime<Utc>>,

    /// End of the validity window. `None` = unbounded.
    pub valid_to: Option<DateTime<Utc>>,

    pub status: CouponStatus,

    /// Optional restriction to a subset of the seller's products.
    /// `None` (or empty) means the coupon applies to the whole cart.
    pub eligible_product_ids: Option<Vec<String>>,

    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// Returns the minimum-buy threshold as Money.
    #[inline]
    pub fn min_buy(&self) -> Money {
        Money::from_cents(self.min_buy_cents)
    }

    /// Whether a product participates in this coupon's discount base.
    pub fn applies_to(&self, product_id: &str) -> bool {
        match &self.eligible_product_ids {
            Some(ids) if !ids.is_empty() => ids.iter().any(|id| id == product_id),
            _ => true,
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer record, created lazily on first checkout with a new phone.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    /// Unique lookup key.
    pub phone: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order
// =============================================================================

/// A committed order. Immutable once written except for later status
/// transitions, which are outside this engine.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,

    /// Unique human-readable identifier shown on receipts.
    pub code: String,

    pub seller_id: String,

    /// Resolved customer, if any. Walk-in orders have none.
    pub customer_id: Option<String>,

    pub payment_method: PaymentMethod,

    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub grand_total_cents: i64,
    pub tendered_cents: i64,
    pub change_cents: i64,

    pub created_at: DateTime<Utc>,
}

/// A line item in an order.
/// The unit price is frozen at sale time, so later catalog price changes
/// do not rewrite history.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price at time of sale, in the smallest currency unit.
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderLine {
    /// Returns this line's total (unit price × quantity) as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.price_cents).multiply_quantity(self.quantity)
    }
}

/// Audit record of a coupon redeemed on a committed order.
/// Only written when the order resolved a customer.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponRedemption {
    pub id: String,
    pub coupon_id: String,
    pub customer_id: String,
    pub used_at: DateTime<Utc>,
}

// =============================================================================
// Boundary Objects
// =============================================================================

/// One line of the client-built cart. Ephemeral, never persisted as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i64,
    /// Unit price the client displayed, in the smallest currency unit.
    pub unit_price_cents: i64,
}

impl CartLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns this line's total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// The checkout submission crossing the system boundary.
///
/// Validated once here at the edge; business logic never re-parses loose
/// structures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub cart_items: Vec<CartLine>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_method: PaymentMethod,
    /// Amount the customer handed over (cash) in the smallest currency unit.
    pub tendered_cents: i64,
    /// Operator-supplied discount, used only when no coupon code is given.
    pub manual_discount_cents: i64,
    pub coupon_code: Option<String>,
}

/// The authenticated seller identity, supplied by the auth gate upstream.
///
/// Passed explicitly into the orchestrator; the engine never reads ambient
/// session state.
#[derive(Debug, Clone)]
pub struct SellerContext {
    pub seller_id: String,
}

impl SellerContext {
    pub fn new(seller_id: impl Into<String>) -> Self {
        SellerContext {
            seller_id: seller_id.into(),
        }
    }
}

/// A settled line echoed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettledLine {
    pub product_id: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub line_total_cents: i64,
}

/// The settlement returned on a successful checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResult {
    pub order_id: String,
    pub order_code: String,
    pub customer_id: Option<String>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub grand_total_cents: i64,
    pub tendered_cents: i64,
    pub change_cents: i64,
    pub lines: Vec<SettledLine>,
}

// =============================================================================
// Unit Tests
// =============================================================================
