//! # Order Repository
//!
//! Persistence for committed orders and their lines.
//!
//! ## Order Codes
//!
//! Every order carries a human-readable code, `YYMMDD-HHMMSS-NNNN`, shown on
//! receipts. The timestamp makes codes roughly sortable; the random suffix
//! keeps two checkouts in the same second apart. Uniqueness is enforced by
//! the database, not by the generator: the insert retries with a fresh code
//! when `orders.code` collides. A SQLite constraint failure aborts only the
//! statement, so the surrounding checkout transaction stays usable through
//! the retries.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use lapak_core::{Order, OrderLine, ORDER_CODE_RETRIES};

/// Generates a fresh order code from a timestamp and a random suffix.
fn generate_code(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().as_u128() % 10_000;
    format!("{}-{:04}", now.format("%y%m%d-%H%M%S"), suffix)
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order by ID. Pool read.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, code, seller_id, customer_id, payment_method, \
                    subtotal_cents, discount_cents, grand_total_cents, \
                    tendered_cents, change_cents, created_at \
             FROM orders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets the lines of an order, in insertion order. Pool read.
    pub async fn get_lines(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            "SELECT id, order_id, product_id, quantity, price_cents, created_at \
             FROM order_lines WHERE order_id = ? ORDER BY rowid",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists a seller's orders, newest first. Pool read.
    pub async fn list_for_seller(&self, seller_id: &str, limit: u32) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT id, code, seller_id, customer_id, payment_method, \
                    subtotal_cents, discount_cents, grand_total_cents, \
                    tendered_cents, change_cents, created_at \
             FROM orders WHERE seller_id = ? \
             ORDER BY created_at DESC LIMIT ?",
        )
        .bind(seller_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Inserts the order header inside the checkout transaction, generating
    /// the id and a unique code.
    ///
    /// On an `orders.code` collision the insert retries with a fresh code;
    /// any other error propagates immediately. The generated id and code are
    /// written back into `order`.
    pub async fn insert_with_unique_code(
        conn: &mut SqliteConnection,
        order: &mut Order,
    ) -> DbResult<()> {
        order.id = Uuid::new_v4().to_string();

        // First attempt + ORDER_CODE_RETRIES regenerations
        for attempt in 0..=ORDER_CODE_RETRIES {
            order.code = generate_code(order.created_at);

            let result = sqlx::query(
                "INSERT INTO orders \
                    (id, code, seller_id, customer_id, payment_method, \
                     subtotal_cents, discount_cents, grand_total_cents, \
                     tendered_cents, change_cents, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&order.id)
            .bind(&order.code)
            .bind(&order.seller_id)
            .bind(&order.customer_id)
            .bind(order.payment_method)
            .bind(order.subtotal_cents)
            .bind(order.discount_cents)
            .bind(order.grand_total_cents)
            .bind(order.tendered_cents)
            .bind(order.change_cents)
            .bind(order.created_at)
            .execute(&mut *conn)
            .await
            .map_err(DbError::from);

            match result {
                Ok(_) => {
                    debug!(order_id = %order.id, code = %order.code, "order inserted");
                    return Ok(());
                }
                Err(err) if err.is_unique_violation_on("orders.code") => {
                    warn!(code = %order.code, attempt, "order code collision, regenerating");
                }
                Err(err) => return Err(err),
            }
        }

        Err(DbError::Internal(
            "could not generate a unique order code".to_string(),
        ))
    }

    /// Inserts one order line inside the checkout transaction.
    pub async fn insert_line(conn: &mut SqliteConnection, line: &OrderLine) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO order_lines (id, order_id, product_id, quantity, price_cents, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&line.id)
        .bind(&line.order_id)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.price_cents)
        .bind(line.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_format() {
        let now = Utc::now();
        let code = generate_code(now);

        // YYMMDD-HHMMSS-NNNN
        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 6);
        assert_eq!(parts[1].len(), 6);
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }
}
