//! In-memory storefront store.
//!
//! Backs handler and router tests. Order insertion and the stock decrement
//! happen under one lock, so concurrent deliveries observe the same guarantees
//! as the PostgreSQL adapter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::order::Order;
use crate::ports::{InsertOutcome, SaleOutcome, StorefrontStore};

#[derive(Default)]
struct Ledger {
    orders: Vec<Order>,
    stock: HashMap<String, i32>,
}

impl Ledger {
    fn insert(&mut self, order: &Order) -> InsertOutcome {
        let key = order.dedup_key();
        let duplicate = self.orders.iter().any(|o| o.dedup_key() == key);
        if duplicate {
            return InsertOutcome::Conflict;
        }
        self.orders.push(order.clone());
        InsertOutcome::Inserted
    }

    fn decrement(&mut self, product_id: &str) -> bool {
        match self.stock.get_mut(product_id) {
            Some(units) if *units > 0 => {
                *units -= 1;
                true
            }
            _ => false,
        }
    }
}

/// Storefront store held entirely in process memory.
#[derive(Default)]
pub struct InMemoryStorefrontStore {
    ledger: RwLock<Ledger>,
    calls: AtomicUsize,
}

impl InMemoryStorefrontStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given product stock levels.
    pub fn with_products<I, S>(products: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        let stock = products
            .into_iter()
            .map(|(id, units)| (id.into(), units))
            .collect();
        Self {
            ledger: RwLock::new(Ledger {
                orders: Vec::new(),
                stock,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    // === Test Helpers ===

    /// Returns a snapshot of all stored orders.
    pub async fn orders(&self) -> Vec<Order> {
        self.ledger.read().await.orders.clone()
    }

    /// Returns the current stock without counting as a store call.
    pub async fn stock_of(&self, product_id: &str) -> Option<i32> {
        self.ledger.read().await.stock.get(product_id).copied()
    }

    /// Number of port operations invoked so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StorefrontStore for InMemoryStorefrontStore {
    async fn insert_order(&self, order: &Order) -> Result<InsertOutcome, DomainError> {
        self.record_call();
        Ok(self.ledger.write().await.insert(order))
    }

    async fn product_stock(&self, product_id: &str) -> Result<Option<i32>, DomainError> {
        self.record_call();
        Ok(self.ledger.read().await.stock.get(product_id).copied())
    }

    async fn decrement_stock_if_positive(&self, product_id: &str) -> Result<bool, DomainError> {
        self.record_call();
        Ok(self.ledger.write().await.decrement(product_id))
    }

    async fn record_completed_sale(&self, order: &Order) -> Result<SaleOutcome, DomainError> {
        self.record_call();
        let mut ledger = self.ledger.write().await;

        if ledger.insert(order) == InsertOutcome::Conflict {
            return Ok(SaleOutcome::Duplicate);
        }

        let stock_decremented = order
            .product_id
            .as_deref()
            .map(|product_id| ledger.decrement(product_id))
            .unwrap_or(false);

        Ok(SaleOutcome::Recorded { stock_decremented })
    }
}
