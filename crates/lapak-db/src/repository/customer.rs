//! # Customer Directory
//!
//! Phone-keyed customer resolution.
//!
//! ## Resolution Rules
//! ```text
//! phone = None          → walk-in order, no customer row touched
//! phone matches a row   → reuse that customer (name on file wins)
//! phone is new + name   → create the customer inside the checkout tx
//! phone is new, no name → unresolved; order proceeds without a customer
//! ```
//! Creation happens on the checkout's own connection, so a checkout that
//! fails later never leaves behind a half-registered customer.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use lapak_core::Customer;

/// Directory of customers, keyed by phone number.
#[derive(Debug, Clone)]
pub struct CustomerDirectory {
    pool: SqlitePool,
}

impl CustomerDirectory {
    /// Creates a new CustomerDirectory.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerDirectory { pool }
    }

    /// Finds a customer by phone number. Pool read.
    pub async fn find_by_phone(&self, phone: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, phone, name, created_at FROM customers WHERE phone = ?",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Gets a customer by id. Pool read.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, phone, name, created_at FROM customers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Resolves the customer for a checkout, inside its transaction.
    ///
    /// Returns the customer id, or `None` when the order stays unlinked
    /// (no phone, or a new phone without a name to register it under).
    /// Existing customers keep their stored name; the submitted name only
    /// matters when the phone number is new.
    pub async fn resolve(
        conn: &mut SqliteConnection,
        phone: Option<&str>,
        name: Option<&str>,
    ) -> DbResult<Option<String>> {
        let Some(phone) = phone else {
            return Ok(None);
        };

        let existing: Option<(String,)> =
            sqlx::query_as("SELECT id FROM customers WHERE phone = ?")
                .bind(phone)
                .fetch_optional(&mut *conn)
                .await?;

        if let Some((id,)) = existing {
            debug!(customer_id = %id, "existing customer resolved");
            return Ok(Some(id));
        }

        // A new phone number needs a name to register under; without one the
        // order proceeds unlinked.
        let Some(name) = name.filter(|n| !n.trim().is_empty()) else {
            return Ok(None);
        };

        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO customers (id, phone, name, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(phone)
            .bind(name.trim())
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;

        debug!(customer_id = %id, "new customer registered");
        Ok(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::uow::UnitOfWork;

    #[tokio::test]
    async fn test_resolve_walk_in_is_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut uow = UnitOfWork::begin(db.pool()).await.unwrap();
        let id = CustomerDirectory::resolve(uow.conn(), None, Some("Ani"))
            .await
            .unwrap();
        assert!(id.is_none());
        uow.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_resolve_creates_then_reuses() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut uow = UnitOfWork::begin(db.pool()).await.unwrap();
        let first = CustomerDirectory::resolve(uow.conn(), Some("0812000111"), Some("Ani"))
            .await
            .unwrap()
            .unwrap();
        // Same phone, different name: stored name wins
        let second = CustomerDirectory::resolve(uow.conn(), Some("0812000111"), Some("Budi"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first, second);
        uow.commit().await.unwrap();

        let stored = db
            .customers()
            .find_by_phone("0812000111")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.name, "Ani");
    }

    #[tokio::test]
    async fn test_resolve_new_phone_without_name_stays_unlinked() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut uow = UnitOfWork::begin(db.pool()).await.unwrap();
        let id = CustomerDirectory::resolve(uow.conn(), Some("0812000222"), None)
            .await
            .unwrap();
        assert!(id.is_none());

        // Blank names count as absent too
        let id = CustomerDirectory::resolve(uow.conn(), Some("0812000222"), Some("  "))
            .await
            .unwrap();
        assert!(id.is_none());
        uow.commit().await.unwrap();

        assert!(db
            .customers()
            .find_by_phone("0812000222")
            .await
            .unwrap()
            .is_none());
    }
}
