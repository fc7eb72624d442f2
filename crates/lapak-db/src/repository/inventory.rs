//! # Inventory Ledger
//!
//! The authoritative stock decision. Runs only inside a checkout's unit of
//! work; the advisory pool reads in the orchestrator exist purely for early,
//! precise errors.
//!
//! ## The Guarded Decrement
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │  UPDATE products                                                       │
//! │  SET stock = stock - :qty, sold_count = sold_count + :qty              │
//! │  WHERE id = :id AND seller_id = :seller                                │
//! │    AND published = 1 AND stock >= :qty                                 │
//! │                                                                        │
//! │  rows_affected == 1  →  reservation succeeded                          │
//! │  rows_affected == 0  →  re-read the row to say WHY:                    │
//! │        missing / unpublished / wrong seller → ProductUnavailable       │
//! │        stock < qty                          → InsufficientStock        │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With `BEGIN IMMEDIATE` holding the write lock, the value of `stock` the
//! guard sees cannot change under us. Two checkouts racing for the last unit
//! serialize; exactly one decrements, the other diagnoses InsufficientStock.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbError;
use lapak_core::{CartLine, CheckoutError};

/// Transactional stock operations. Stateless; all methods take the unit of
/// work's connection.
pub struct InventoryLedger;

impl InventoryLedger {
    /// Decrements stock (and bumps sold counters) for every cart line, or
    /// fails on the first line that cannot be satisfied.
    ///
    /// Partial decrements roll back with the rest of the checkout; the
    /// caller owns the transaction.
    pub async fn reserve_and_decrement(
        conn: &mut SqliteConnection,
        seller_id: &str,
        lines: &[CartLine],
    ) -> Result<(), CheckoutError> {
        for line in lines {
            let result = sqlx::query(
                "UPDATE products \
                 SET stock = stock - ?, sold_count = sold_count + ?, updated_at = ? \
                 WHERE id = ? AND seller_id = ? AND published = 1 AND stock >= ?",
            )
            .bind(line.quantity)
            .bind(line.quantity)
            .bind(chrono::Utc::now())
            .bind(&line.product_id)
            .bind(seller_id)
            .bind(line.quantity)
            .execute(&mut *conn)
            .await
            .map_err(DbError::from)?;

            if result.rows_affected() == 0 {
                return Err(Self::diagnose(conn, seller_id, line).await?);
            }

            debug!(
                product_id = %line.product_id,
                quantity = line.quantity,
                "stock reserved"
            );
        }

        Ok(())
    }

    /// The guard rejected the decrement. Read the row back to report a
    /// precise reason.
    async fn diagnose(
        conn: &mut SqliteConnection,
        seller_id: &str,
        line: &CartLine,
    ) -> Result<CheckoutError, CheckoutError> {
        let row: Option<(i64, bool, String)> = sqlx::query_as(
            "SELECT stock, published, seller_id FROM products WHERE id = ?",
        )
        .bind(&line.product_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(DbError::from)?;

        Ok(match row {
            Some((stock, true, ref owner)) if owner == seller_id => {
                CheckoutError::InsufficientStock {
                    product_id: line.product_id.clone(),
                    available: stock,
                    requested: line.quantity,
                }
            }
            // Missing, unpublished, or owned by another seller: the caller
            // does not learn which.
            _ => CheckoutError::ProductUnavailable {
                product_id: line.product_id.clone(),
            },
        })
    }
}
