//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `StorefrontStore` - Order ledger and product stock, with idempotent writes

mod storefront_store;

pub use storefront_store::{InsertOutcome, SaleOutcome, StorefrontStore};
