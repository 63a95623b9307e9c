//! PostgreSQL adapters - Database implementations for storage ports.
//!
//! - `PostgresStorefrontStore` - Order ledger and product stock
//! - `connect_pool` / `run_migrations` - Pool construction and schema setup

mod pool;
mod storefront_store;

pub use pool::{connect_pool, run_migrations};
pub use storefront_store::PostgresStorefrontStore;
