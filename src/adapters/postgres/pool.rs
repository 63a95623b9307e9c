//! Connection pool setup.

use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

/// Builds a lazily connecting pool.
///
/// The credential replaces any password in the URL. Each session gets a
/// server-side `statement_timeout` matching the configured storage bound.
pub fn connect_pool(
    config: &DatabaseConfig,
    credential: &SecretString,
) -> Result<PgPool, DomainError> {
    let options = PgConnectOptions::from_str(&config.url)
        .map_err(|e| DomainError::database(format!("Invalid database URL: {}", e)))?
        .password(credential.expose_secret())
        .options([(
            "statement_timeout",
            format!("{}s", config.statement_timeout_secs),
        )]);

    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .connect_lazy_with(options);

    Ok(pool)
}

/// Applies pending migrations from `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::database(format!("Migration failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_malformed_url() {
        let config = DatabaseConfig {
            url: "postgresql://[::1".to_string(),
            ..Default::default()
        };
        let credential = SecretString::new("key".to_string());

        assert!(connect_pool(&config, &credential).is_err());
    }

    #[tokio::test]
    async fn builds_pool_without_connecting() {
        let config = DatabaseConfig {
            url: "postgresql://storefront@127.0.0.1:1/shop".to_string(),
            min_connections: 0,
            ..Default::default()
        };
        let credential = SecretString::new("key".to_string());

        let pool = connect_pool(&config, &credential).unwrap();
        assert_eq!(pool.size(), 0);
    }
}
