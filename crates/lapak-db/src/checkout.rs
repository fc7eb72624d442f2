//! # Checkout Orchestrator
//!
//! Drives a checkout from submitted cart to committed order.
//!
//! ## Flow
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Flow                                   │
//! │                                                                        │
//! │  CheckoutRequest                                                       │
//! │       │                                                                │
//! │       ▼                                                                │
//! │  1. VALIDATE    cart shape, phone, coupon code (lapak-core)            │
//! │       │                                                                │
//! │       ▼                                                                │
//! │  2. ADVISORY    pool reads: product exists / published / this seller   │
//! │       │         / stock looks sufficient. Early, precise errors only;  │
//! │       │         nothing here is trusted at commit time.                │
//! │       ▼                                                                │
//! │  3. COMMIT      one BEGIN IMMEDIATE unit of work:                      │
//! │       │           coupon read + evaluate (or manual discount)          │
//! │       │           settle payment                                       │
//! │       │           resolve customer                                     │
//! │       │           insert order (unique code, retry) + lines            │
//! │       │           guarded stock decrement                              │
//! │       │           guarded coupon redemption                            │
//! │       ▼                                                                │
//! │  CheckoutResult      any error above → ROLLBACK, nothing persists      │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The coupon row is read inside the unit of work so the state it is
//! evaluated against is the state the commit sees.

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::pool::Database;
use crate::repository::{CouponRepository, CustomerDirectory, InventoryLedger, OrderRepository};
use crate::uow::UnitOfWork;
use lapak_core::{
    coupon, pricing, validation, CheckoutError, CheckoutRequest, CheckoutResult, Coupon, Order,
    OrderLine, SellerContext, SettledLine,
};

/// Orchestrates checkouts against a database.
#[derive(Debug, Clone)]
pub struct CheckoutOrchestrator {
    db: Database,
}

impl CheckoutOrchestrator {
    /// Creates a new orchestrator over the given database.
    pub fn new(db: Database) -> Self {
        CheckoutOrchestrator { db }
    }

    /// Runs one checkout end to end.
    ///
    /// Either the whole order commits (stock decremented, order and lines
    /// written, customer resolved, coupon redeemed) or nothing does.
    #[instrument(skip(self, req), fields(seller_id = %ctx.seller_id))]
    pub async fn checkout(
        &self,
        ctx: &SellerContext,
        req: &CheckoutRequest,
    ) -> Result<CheckoutResult, CheckoutError> {
        // Phase 1: boundary validation, before touching the database.
        validation::validate_cart(&req.cart_items)?;

        let phone = match &req.customer_phone {
            Some(raw) => validation::validate_phone(raw)?,
            None => None,
        };
        let coupon_code = match &req.coupon_code {
            Some(raw) => Some(validation::validate_coupon_code(raw)?),
            None => None,
        };

        // Phase 2: advisory product checks on pool reads.
        self.advisory_check(ctx, req).await?;

        // Phase 3: the commit unit. Every statement from here runs on one
        // write-locked connection; any error rolls the whole unit back.
        let mut uow = UnitOfWork::begin(self.db.pool()).await?;

        let outcome = Self::commit_cart(
            &mut uow,
            ctx,
            req,
            phone.as_deref(),
            coupon_code.as_deref(),
        )
        .await;

        match outcome {
            Ok(result) => {
                uow.commit().await?;
                info!(
                    order_id = %result.order_id,
                    order_code = %result.order_code,
                    grand_total_cents = result.grand_total_cents,
                    "checkout settled"
                );
                Ok(result)
            }
            Err(err) => {
                if let Err(rb_err) = uow.rollback().await {
                    warn!(error = %rb_err, "checkout rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Pre-checks each cart line against a recent read of the catalog.
    ///
    /// Purely advisory. It exists so the common failure modes surface with
    /// precise errors before the write lock is taken; the guarded decrement
    /// repeats every check authoritatively.
    async fn advisory_check(
        &self,
        ctx: &SellerContext,
        req: &CheckoutRequest,
    ) -> Result<(), CheckoutError> {
        let products = self.db.products();

        for line in &req.cart_items {
            let product = products
                .get_by_id(&line.product_id)
                .await?
                .filter(|p| p.sellable_by(&ctx.seller_id))
                .ok_or_else(|| CheckoutError::ProductUnavailable {
                    product_id: line.product_id.clone(),
                })?;

            if product.stock < line.quantity {
                return Err(CheckoutError::InsufficientStock {
                    product_id: line.product_id.clone(),
                    available: product.stock,
                    requested: line.quantity,
                });
            }
        }

        Ok(())
    }

    /// The transactional body of a checkout. The caller owns commit and
    /// rollback.
    async fn commit_cart(
        uow: &mut UnitOfWork,
        ctx: &SellerContext,
        req: &CheckoutRequest,
        phone: Option<&str>,
        coupon_code: Option<&str>,
    ) -> Result<CheckoutResult, CheckoutError> {
        let now = Utc::now();
        let subtotal = pricing::cart_subtotal(&req.cart_items);

        // Coupon wins over manual discount; they are never combined.
        let applied_coupon: Option<Coupon> = match coupon_code {
            Some(code) => Some(
                CouponRepository::find_by_code(uow.conn(), &ctx.seller_id, code)
                    .await?
                    .ok_or(CheckoutError::CouponNotFound)?,
            ),
            None => None,
        };

        let discount = match &applied_coupon {
            Some(c) => coupon::evaluate(c, &req.cart_items, now)?,
            None => pricing::manual_discount(req.manual_discount_cents, subtotal)?,
        };

        let settlement = pricing::settle(req.payment_method, subtotal, discount, req.tendered_cents)?;

        let customer_id =
            CustomerDirectory::resolve(uow.conn(), phone, req.customer_name.as_deref()).await?;

        let mut order = Order {
            id: String::new(),
            code: String::new(),
            seller_id: ctx.seller_id.clone(),
            customer_id: customer_id.clone(),
            payment_method: req.payment_method,
            subtotal_cents: settlement.subtotal.cents(),
            discount_cents: settlement.discount.cents(),
            grand_total_cents: settlement.grand_total.cents(),
            tendered_cents: settlement.tendered.cents(),
            change_cents: settlement.change.cents(),
            created_at: now,
        };
        OrderRepository::insert_with_unique_code(uow.conn(), &mut order).await?;

        let mut settled_lines = Vec::with_capacity(req.cart_items.len());
        for item in &req.cart_items {
            let line = OrderLine {
                id: uuid::Uuid::new_v4().to_string(),
                order_id: order.id.clone(),
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                price_cents: item.unit_price_cents,
                created_at: now,
            };
            OrderRepository::insert_line(uow.conn(), &line).await?;

            settled_lines.push(SettledLine {
                product_id: line.product_id,
                quantity: line.quantity,
                price_cents: line.price_cents,
                line_total_cents: item.line_total().cents(),
            });
        }

        InventoryLedger::reserve_and_decrement(uow.conn(), &ctx.seller_id, &req.cart_items)
            .await?;

        if let Some(c) = &applied_coupon {
            CouponRepository::redeem(uow.conn(), c, customer_id.as_deref(), now).await?;
        }

        Ok(CheckoutResult {
            order_id: order.id,
            order_code: order.code,
            customer_id,
            subtotal_cents: settlement.subtotal.cents(),
            discount_cents: settlement.discount.cents(),
            grand_total_cents: settlement.grand_total.cents(),
            tendered_cents: settlement.tendered.cents(),
            change_cents: settlement.change.cents(),
            lines: settled_lines,
        })
    }
}
