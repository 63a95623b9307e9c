//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared error types
//! - `order` - Order records and statuses
//! - `webhook` - Signature verification, provider profiles, payload normalization

pub mod foundation;
pub mod order;
pub mod webhook;
