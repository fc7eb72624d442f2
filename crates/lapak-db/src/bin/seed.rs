//! # Seed Data Generator
//!
//! Populates a database with demo products and coupons for development.
//!
//! ## Usage
//! ```bash
//! cargo run --bin seed                      # seeds ./lapak.db
//! LAPAK_DB=/tmp/demo.db cargo run --bin seed
//! ```
//!
//! Idempotent in the cheap sense: it refuses to run against a database that
//! already has products.

use chrono::{Duration, Utc};
use tracing::info;

use lapak_core::{Coupon, CouponStatus, DiscountType, Product};
use lapak_db::{Database, DbConfig};

const DEMO_SELLER: &str = "seller-demo";

fn demo_products() -> Vec<(&'static str, i64, i64)> {
    vec![
        ("Kopi Susu Gula Aren", 18_000, 50),
        ("Es Teh Manis", 8_000, 80),
        ("Roti Bakar Coklat", 15_000, 30),
        ("Nasi Goreng Spesial", 25_000, 20),
        ("Air Mineral 600ml", 5_000, 120),
        ("Keripik Singkong", 12_000, 40),
        ("Mie Goreng Jawa", 22_000, 25),
        ("Pisang Goreng (5 pcs)", 10_000, 35),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let path = std::env::var("LAPAK_DB").unwrap_or_else(|_| "lapak.db".to_string());
    let db = Database::new(DbConfig::new(&path)).await?;

    let products = db.products();
    if products.count().await? > 0 {
        info!(path = %path, "database already seeded, nothing to do");
        return Ok(());
    }

    info!(path = %path, "seeding demo data");

    let mut first_product_id = String::new();
    for (name, price, stock) in demo_products() {
        let mut product = Product {
            id: String::new(),
            seller_id: DEMO_SELLER.to_string(),
            name: name.to_string(),
            price_cents: price,
            stock,
            sold_count: 0,
            published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        products.insert(&mut product).await?;
        if first_product_id.is_empty() {
            first_product_id = product.id.clone();
        }
    }

    let now = Utc::now();
    let coupons = db.coupons();

    // Flat discount, whole cart, no limits
    let mut flat = Coupon {
        id: String::new(),
        seller_id: DEMO_SELLER.to_string(),
        code: "HEMAT5".to_string(),
        discount_type: DiscountType::Amount,
        discount_value: 5_000,
        min_buy_cents: 25_000,
        usage_limit: 0,
        used_count: 0,
        valid_from: None,
        valid_to: None,
        status: CouponStatus::Enabled,
        eligible_product_ids: None,
        created_at: now,
    };
    coupons.insert(&mut flat).await?;

    // Percent discount, time-boxed, capped at 100 uses
    let mut percent = Coupon {
        id: String::new(),
        seller_id: DEMO_SELLER.to_string(),
        code: "GAJIAN10".to_string(),
        discount_type: DiscountType::Percent,
        discount_value: 10,
        min_buy_cents: 50_000,
        usage_limit: 100,
        used_count: 0,
        valid_from: Some(now),
        valid_to: Some(now + Duration::days(7)),
        status: CouponStatus::Enabled,
        eligible_product_ids: None,
        created_at: now,
    };
    coupons.insert(&mut percent).await?;

    // Restricted to one product
    let mut restricted = Coupon {
        id: String::new(),
        seller_id: DEMO_SELLER.to_string(),
        code: "KOPI20".to_string(),
        discount_type: DiscountType::Percent,
        discount_value: 20,
        min_buy_cents: 0,
        usage_limit: 0,
        used_count: 0,
        valid_from: None,
        valid_to: None,
        status: CouponStatus::Enabled,
        eligible_product_ids: Some(vec![first_product_id]),
        created_at: now,
    };
    coupons.insert(&mut restricted).await?;

    info!(
        products = demo_products().len(),
        coupons = 3,
        seller = DEMO_SELLER,
        "seed complete"
    );
    Ok(())
}
