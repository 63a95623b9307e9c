//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum webhook endpoints
//! - `postgres` - PostgreSQL order ledger and stock
//! - `memory` - In-process store backing handler and router tests
//! - `fail_closed` - Store used when no storage credential is configured

mod fail_closed;
pub mod http;
pub mod memory;
pub mod postgres;

pub use fail_closed::FailClosedStore;
pub use memory::InMemoryStorefrontStore;
pub use postgres::PostgresStorefrontStore;
