//! # Repository Layer
//!
//! Data access for the checkout engine's entities.
//!
//! ## Structure
//! ```text
//! repository/
//! ├── mod.rs       ← You are here
//! ├── product.rs   ← Catalog reads + advisory stock checks
//! ├── inventory.rs ← Authoritative stock decrement (transactional)
//! ├── coupon.rs    ← Coupon lookup, evaluation support, redemption
//! ├── customer.rs  ← Phone-keyed customer resolution
//! └── order.rs     ← Order + order line persistence, unique codes
//! ```
//!
//! ## Two Kinds of Methods
//!
//! Pool methods (`&self`, run on any connection) serve advisory reads and
//! out-of-checkout administration. Transactional associated functions take
//! `&mut SqliteConnection` and only ever run inside a checkout's unit of
//! work; they are the authoritative path.

pub mod coupon;
pub mod customer;
pub mod inventory;
pub mod order;
pub mod product;

pub use coupon::CouponRepository;
pub use customer::CustomerDirectory;
pub use inventory::InventoryLedger;
pub use order::OrderRepository;
pub use product::ProductRepository;
