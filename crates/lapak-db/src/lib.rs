//! # lapak-db: Persistence Layer for the Lapak Checkout Engine
//!
//! This crate provides database access for the checkout engine.
//! It uses SQLite for local storage with sqlx for async operations, and
//! hosts the checkout orchestrator because the transaction boundary lives
//! here.
//!
//! ## Architecture Position
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │                      Lapak Checkout Architecture                       │
//! │                                                                        │
//! │  ┌────────────────────────────────────────────────────────────────┐   │
//! │  │                    lapak-core (Pure Logic)                     │   │
//! │  │            pricing, coupon rules, validation, types            │   │
//! │  └────────────────────────────┬───────────────────────────────────┘   │
//! │                               │ uses types from                        │
//! │  ┌────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 ★ lapak-db (THIS CRATE) ★                      │   │
//! │  │                                                                │   │
//! │  │  ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌───────────────┐  │   │
//! │  │  │   pool    │ │migrations │ │repository │ │   checkout    │  │   │
//! │  │  │ SqlitePool│ │  embedded │ │ products  │ │ orchestrator  │  │   │
//! │  │  │ WAL mode  │ │    SQL    │ │ coupons.. │ │ + UnitOfWork  │  │   │
//! │  │  └───────────┘ └───────────┘ └───────────┘ └───────────────┘  │   │
//! │  └────────────────────────────┬───────────────────────────────────┘   │
//! │                               │                                        │
//! │                        ┌──────▼──────┐                                 │
//! │                        │   SQLite    │                                 │
//! │                        └─────────────┘                                 │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//! ```rust,ignore
//! use lapak_db::{CheckoutOrchestrator, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("lapak.db")).await?;
//! let orchestrator = CheckoutOrchestrator::new(db);
//! let result = orchestrator.checkout(&ctx, &request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod uow;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::CheckoutOrchestrator;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{
    CouponRepository, CustomerDirectory, InventoryLedger, OrderRepository, ProductRepository,
};
pub use uow::UnitOfWork;
