//! # Unit of Work
//!
//! One checkout, one write transaction.
//!
//! ## Why BEGIN IMMEDIATE
//!
//! SQLite's default deferred transactions take the write lock lazily, on the
//! first write statement. A transaction that reads first (stock, coupon
//! usage) and writes later can then discover its snapshot is stale and fail
//! with SQLITE_BUSY at the upgrade point. `BEGIN IMMEDIATE` takes the write
//! lock up front, so two concurrent checkouts serialize cleanly: the second
//! waits on the busy timeout and then sees the first one's committed stock.
//!
//! ## Usage
//! ```rust,ignore
//! let mut uow = UnitOfWork::begin(db.pool()).await?;
//! // ... run statements on uow.conn() ...
//! uow.commit().await?;
//! ```
//!
//! Built on sqlx's `Transaction` (opened with a custom BEGIN statement), so
//! a unit of work that is dropped without an explicit `commit` or
//! `rollback` rolls back before its connection is reused. That covers a
//! checkout future cancelled mid-await as well as a panic: the write lock is
//! always released.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// A pessimistic write transaction on a dedicated pooled connection.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    /// Acquires a connection and opens an immediate (write-locked)
    /// transaction on it.
    pub async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let tx = pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(DbError::from)?;

        debug!("unit of work started");
        Ok(UnitOfWork { tx })
    }

    /// The transaction's connection. Every statement of the unit of work
    /// must run through this, never through the pool.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    /// Commits the transaction.
    pub async fn commit(self) -> DbResult<()> {
        self.tx.commit().await.map_err(DbError::from)?;

        debug!("unit of work committed");
        Ok(())
    }

    /// Rolls the transaction back, discarding every write it made.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx.rollback().await.map_err(DbError::from)?;

        debug!("unit of work rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn insert_customer(uow: &mut UnitOfWork, id: &str, phone: &str) {
        sqlx::query(
            "INSERT INTO customers (id, phone, name, created_at) \
             VALUES (?, ?, 'Test', '2026-01-01T00:00:00Z')",
        )
        .bind(id)
        .bind(phone)
        .execute(uow.conn())
        .await
        .unwrap();
    }

    async fn customer_count(db: &Database) -> i64 {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
            .fetch_one(db.pool())
            .await
            .unwrap();
        count.0
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut uow = UnitOfWork::begin(db.pool()).await.unwrap();
        insert_customer(&mut uow, "c1", "0800").await;
        uow.rollback().await.unwrap();

        assert_eq!(customer_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_commit_persists_writes() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut uow = UnitOfWork::begin(db.pool()).await.unwrap();
        insert_customer(&mut uow, "c1", "0800").await;
        uow.commit().await.unwrap();

        assert_eq!(customer_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_dropped_uow_rolls_back_and_frees_the_connection() {
        // Single-connection pool: if an abandoned transaction stuck to the
        // connection, every later operation here would fail or see its
        // writes.
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        {
            let mut uow = UnitOfWork::begin(db.pool()).await.unwrap();
            insert_customer(&mut uow, "c1", "0800").await;
            // dropped without commit or rollback
        }

        assert_eq!(customer_count(&db).await, 0);

        // The same connection must accept a fresh write transaction
        let mut uow = UnitOfWork::begin(db.pool()).await.unwrap();
        insert_customer(&mut uow, "c2", "0801").await;
        uow.commit().await.unwrap();

        assert_eq!(customer_count(&db).await, 1);
    }
}
