//! # Coupon Repository
//!
//! Coupon lookup and redemption.
//!
//! ## Split With the Domain Layer
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │  lapak-core::coupon::evaluate()   ← all RULES (status, window,         │
//! │                                     min-buy, eligible lines, amount)   │
//! │                                                                        │
//! │  CouponRepository::redeem()       ← the one AUTHORITATIVE check:       │
//! │                                     guarded used_count increment       │
//! │                                     inside the checkout transaction    │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//! `evaluate()` sees `used_count` too, but only as an advisory early exit.
//! The increment's `WHERE` clause is what actually enforces the limit.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use lapak_core::{CheckoutError, Coupon, CouponStatus, DiscountType};

/// Raw coupon row. `eligible_product_ids` is stored as a JSON array and
/// parsed exactly once, here.
#[derive(sqlx::FromRow)]
struct CouponRow {
    id: String,
    seller_id: String,
    code: String,
    discount_type: DiscountType,
    discount_value: i64,
    min_buy_cents: i64,
    usage_limit: i64,
    used_count: i64,
    valid_from: Option<DateTime<Utc>>,
    valid_to: Option<DateTime<Utc>>,
    status: CouponStatus,
    eligible_product_ids: Option<String>,
    created_at: DateTime<Utc>,
}

impl CouponRow {
    fn into_coupon(self) -> DbResult<Coupon> {
        let eligible_product_ids = match self.eligible_product_ids {
            None => None,
            Some(raw) => Some(serde_json::from_str::<Vec<String>>(&raw).map_err(|e| {
                DbError::CorruptRow {
                    table: "coupons".to_string(),
                    reason: format!("eligible_product_ids is not a JSON string array: {e}"),
                }
            })?),
        };

        Ok(Coupon {
            id: self.id,
            seller_id: self.seller_id,
            code: self.code,
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            min_buy_cents: self.min_buy_cents,
            usage_limit: self.usage_limit,
            used_count: self.used_count,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            status: self.status,
            eligible_product_ids,
            created_at: self.created_at,
        })
    }
}

const COUPON_COLUMNS: &str = "id, seller_id, code, discount_type, discount_value, \
     min_buy_cents, usage_limit, used_count, valid_from, valid_to, status, \
     eligible_product_ids, created_at";

/// Repository for coupon database operations.
#[derive(Debug, Clone)]
pub struct CouponRepository {
    pool: SqlitePool,
}

impl CouponRepository {
    /// Creates a new CouponRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CouponRepository { pool }
    }

    /// Inserts a new coupon, generating its id and timestamp.
    /// Administration path, not part of checkout.
    pub async fn insert(&self, coupon: &mut Coupon) -> DbResult<()> {
        if coupon.id.is_empty() {
            coupon.id = Uuid::new_v4().to_string();
        }
        coupon.created_at = Utc::now();

        let eligible_json = coupon
            .eligible_product_ids
            .as_ref()
            .map(|ids| serde_json::to_string(ids))
            .transpose()
            .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query(
            "INSERT INTO coupons \
                (id, seller_id, code, discount_type, discount_value, min_buy_cents, \
                 usage_limit, used_count, valid_from, valid_to, status, \
                 eligible_product_ids, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&coupon.id)
        .bind(&coupon.seller_id)
        .bind(&coupon.code)
        .bind(coupon.discount_type)
        .bind(coupon.discount_value)
        .bind(coupon.min_buy_cents)
        .bind(coupon.usage_limit)
        .bind(coupon.used_count)
        .bind(coupon.valid_from)
        .bind(coupon.valid_to)
        .bind(coupon.status)
        .bind(eligible_json)
        .bind(coupon.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Looks up a seller's coupon by code. Pool read, for administration and
    /// advisory checks.
    pub async fn get_by_code(&self, seller_id: &str, code: &str) -> DbResult<Option<Coupon>> {
        let row = sqlx::query_as::<_, CouponRow>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE seller_id = ? AND code = ?"
        ))
        .bind(seller_id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CouponRow::into_coupon).transpose()
    }

    /// Transactional lookup by code, on the checkout's own connection so the
    /// coupon state read is the state the commit sees.
    pub async fn find_by_code(
        conn: &mut SqliteConnection,
        seller_id: &str,
        code: &str,
    ) -> DbResult<Option<Coupon>> {
        let row = sqlx::query_as::<_, CouponRow>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE seller_id = ? AND code = ?"
        ))
        .bind(seller_id)
        .bind(code)
        .fetch_optional(&mut *conn)
        .await?;

        row.map(CouponRow::into_coupon).transpose()
    }

    /// Redeems a coupon inside the checkout transaction.
    ///
    /// The increment is guarded: if the usage limit has been reached since
    /// the coupon was evaluated, zero rows update and the whole checkout
    /// fails with `UsageLimitReached`, rolling back stock and order writes.
    ///
    /// The audit row is only written when the order resolved a customer.
    pub async fn redeem(
        conn: &mut SqliteConnection,
        coupon: &Coupon,
        customer_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), CheckoutError> {
        let result = sqlx::query(
            "UPDATE coupons SET used_count = used_count + 1 \
             WHERE id = ? AND (usage_limit = 0 OR used_count < usage_limit)",
        )
        .bind(&coupon.id)
        .execute(&mut *conn)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(CheckoutError::UsageLimitReached);
        }

        if let Some(customer_id) = customer_id {
            sqlx::query(
                "INSERT INTO coupon_redemptions (id, coupon_id, customer_id, used_at) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&coupon.id)
            .bind(customer_id)
            .bind(now)
            .execute(&mut *conn)
            .await
            .map_err(DbError::from)?;
        }

        debug!(coupon_id = %coupon.id, code = %coupon.code, "coupon redeemed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::uow::UnitOfWork;

    fn sample_coupon(seller: &str, code: &str) -> Coupon {
        Coupon {
            id: String::new(),
            seller_id: seller.to_string(),
            code: code.to_string(),
            discount_type: DiscountType::Amount,
            discount_value: 5_000,
            min_buy_cents: 0,
            usage_limit: 0,
            used_count: 0,
            valid_from: None,
            valid_to: None,
            status: CouponStatus::Enabled,
            eligible_product_ids: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_by_code() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.coupons();

        let mut coupon = sample_coupon("s1", "HEMAT5");
        coupon.eligible_product_ids = Some(vec!["p1".to_string(), "p2".to_string()]);
        repo.insert(&mut coupon).await.unwrap();

        let found = repo.get_by_code("s1", "HEMAT5").await.unwrap().unwrap();
        assert_eq!(found.discount_value, 5_000);
        assert_eq!(
            found.eligible_product_ids,
            Some(vec!["p1".to_string(), "p2".to_string()])
        );

        // Scoped per seller
        assert!(repo.get_by_code("s2", "HEMAT5").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_per_seller_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.coupons();

        let mut first = sample_coupon("s1", "HEMAT5");
        repo.insert(&mut first).await.unwrap();

        let mut dup = sample_coupon("s1", "HEMAT5");
        let err = repo.insert(&mut dup).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_redeem_guards_usage_limit() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.coupons();

        let mut coupon = sample_coupon("s1", "ONCE");
        coupon.usage_limit = 1;
        repo.insert(&mut coupon).await.unwrap();

        let mut uow = UnitOfWork::begin(db.pool()).await.unwrap();
        CouponRepository::redeem(uow.conn(), &coupon, None, Utc::now())
            .await
            .unwrap();
        let err = CouponRepository::redeem(uow.conn(), &coupon, None, Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::UsageLimitReached);
        uow.commit().await.unwrap();

        let after = repo.get_by_code("s1", "ONCE").await.unwrap().unwrap();
        assert_eq!(after.used_count, 1);
    }
}
