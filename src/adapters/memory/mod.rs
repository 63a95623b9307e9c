//! In-memory adapters for handler and router tests.

mod storefront_store;

pub use storefront_store::InMemoryStorefrontStore;
