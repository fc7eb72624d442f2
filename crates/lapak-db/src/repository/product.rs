//! # Product Repository
//!
//! Catalog reads for the checkout flow plus basic administration.
//!
//! Stock numbers read here are ADVISORY: they let a checkout fail fast with
//! a precise error before any transaction starts, but the decision that
//! counts is the guarded decrement in [`inventory`](crate::repository::inventory),
//! which re-checks inside the write transaction.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use lapak_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by ID. Returns `None` if it does not exist.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, seller_id, name, price_cents, stock, sold_count, \
                    published, created_at, updated_at \
             FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists a seller's published products, newest first.
    pub async fn list_published(&self, seller_id: &str, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, seller_id, name, price_cents, stock, sold_count, \
                    published, created_at, updated_at \
             FROM products \
             WHERE seller_id = ? AND published = 1 \
             ORDER BY created_at DESC \
             LIMIT ?",
        )
        .bind(seller_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product, generating its id and timestamps.
    pub async fn insert(&self, product: &mut Product) -> DbResult<()> {
        if product.id.is_empty() {
            product.id = Uuid::new_v4().to_string();
        }
        let now = Utc::now();
        product.created_at = now;
        product.updated_at = now;

        debug!(product_id = %product.id, name = %product.name, "inserting product");

        sqlx::query(
            "INSERT INTO products \
                (id, seller_id, name, price_cents, stock, sold_count, \
                 published, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&product.id)
        .bind(&product.seller_id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.sold_count)
        .bind(product.published)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates price, stock, and published flag. Administration path, not
    /// part of checkout.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE products \
             SET name = ?, price_cents = ?, stock = ?, published = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.published)
        .bind(Utc::now())
        .bind(&product.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("product", &product.id));
        }
        Ok(())
    }

    /// Counts all products (for seeding checks).
    pub async fn count(&self) -> DbResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use lapak_core::Product;

    fn sample_product(seller: &str, name: &str, price: i64, stock: i64) -> Product {
        Product {
            id: String::new(),
            seller_id: seller.to_string(),
            name: name.to_string(),
            price_cents: price,
            stock,
            sold_count: 0,
            published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut product = sample_product("s1", "Kopi Susu", 18_000, 10);
        repo.insert(&mut product).await.unwrap();
        assert!(!product.id.is_empty());

        let found = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Kopi Susu");
        assert_eq!(found.price_cents, 18_000);
        assert_eq!(found.stock, 10);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        assert!(repo.get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_published_excludes_unpublished() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut visible = sample_product("s1", "Visible", 1_000, 1);
        repo.insert(&mut visible).await.unwrap();

        let mut hidden = sample_product("s1", "Hidden", 1_000, 1);
        hidden.published = false;
        repo.insert(&mut hidden).await.unwrap();

        let listed = repo.list_published("s1", 10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Visible");
    }
}
