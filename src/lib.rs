//! Storefront Webhooks - Payment provider webhook ingestion
//!
//! Receives signed payment notifications from SellAuth and Sellix, verifies
//! them, normalizes each provider's payload into one order event, and records
//! completed sales exactly once in the storefront's order ledger.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
