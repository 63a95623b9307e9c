//! PostgreSQL implementation of StorefrontStore.
//!
//! Relies on two schema guarantees from the migrations:
//! - `orders_provider_gateway_order_key` UNIQUE (provider, payment_gateway, provider_order_id)
//! - `products_stock_non_negative` CHECK (stock >= 0)

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::order::Order;
use crate::ports::{InsertOutcome, SaleOutcome, StorefrontStore};

const INSERT_ORDER_SQL: &str = r#"
    INSERT INTO orders (
        id, provider, order_number, product_id, customer_email, amount, status,
        provider_order_id, payment_gateway, created_at
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
    ON CONFLICT (provider, payment_gateway, provider_order_id) DO NOTHING
"#;

const DECREMENT_STOCK_SQL: &str = r#"
    UPDATE products
    SET stock = stock - 1
    WHERE id = $1 AND stock > 0
"#;

/// PostgreSQL implementation of the StorefrontStore port.
pub struct PostgresStorefrontStore {
    pool: PgPool,
}

impl PostgresStorefrontStore {
    /// Creates a new store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn insert_query(order: &Order) -> sqlx::query::Query<'_, Postgres, sqlx::postgres::PgArguments> {
    sqlx::query(INSERT_ORDER_SQL)
        .bind(order.id)
        .bind(order.provider.as_str())
        .bind(&order.order_number)
        .bind(&order.product_id)
        .bind(&order.customer_email)
        .bind(order.amount)
        .bind(order.status.as_str())
        .bind(&order.provider_order_id)
        .bind(&order.payment_gateway)
        .bind(order.created_at)
}

/// Maps a sqlx error, keeping the violated constraint name when there is one.
///
/// Waiting too long for a pooled connection is reported as `StorageTimeout`.
fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    let constraint = match &e {
        sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_string),
        _ => None,
    };
    let err = match &e {
        sqlx::Error::PoolTimedOut => {
            DomainError::new(ErrorCode::StorageTimeout, format!("{}: {}", context, e))
        }
        _ => DomainError::database(format!("{}: {}", context, e)),
    };
    match constraint {
        Some(constraint) => err.with_detail("constraint", constraint),
        None => err,
    }
}

fn insert_outcome(rows_affected: u64) -> InsertOutcome {
    if rows_affected == 0 {
        InsertOutcome::Conflict
    } else {
        InsertOutcome::Inserted
    }
}

#[async_trait]
impl StorefrontStore for PostgresStorefrontStore {
    async fn insert_order(&self, order: &Order) -> Result<InsertOutcome, DomainError> {
        let result = insert_query(order)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to insert order", e))?;

        Ok(insert_outcome(result.rows_affected()))
    }

    async fn product_stock(&self, product_id: &str) -> Result<Option<i32>, DomainError> {
        sqlx::query_scalar::<_, i32>("SELECT stock FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to read product stock", e))
    }

    async fn decrement_stock_if_positive(&self, product_id: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(DECREMENT_STOCK_SQL)
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to decrement stock", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_completed_sale(&self, order: &Order) -> Result<SaleOutcome, DomainError> {
        let mut tx: Transaction<'_, Postgres> = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let inserted = insert_query(order)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to insert order", e))?;

        if insert_outcome(inserted.rows_affected()) == InsertOutcome::Conflict {
            tx.rollback()
                .await
                .map_err(|e| db_error("Failed to roll back", e))?;
            return Ok(SaleOutcome::Duplicate);
        }

        let stock_decremented = match order.product_id.as_deref() {
            Some(product_id) => {
                let result = sqlx::query(DECREMENT_STOCK_SQL)
                    .bind(product_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| db_error("Failed to decrement stock", e))?;
                result.rows_affected() > 0
            }
            None => false,
        };

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit sale", e))?;

        Ok(SaleOutcome::Recorded { stock_decremented })
    }
}
