//! Storefront webhook server entry point.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use storefront_webhooks::adapters::http::{webhook_router, HttpLimits, WebhookAppState};
use storefront_webhooks::adapters::postgres::{connect_pool, run_migrations};
use storefront_webhooks::adapters::{FailClosedStore, PostgresStorefrontStore};
use storefront_webhooks::application::{HandleProviderWebhookHandler, OrderReconciler};
use storefront_webhooks::config::{AppConfig, DatabaseConfig};
use storefront_webhooks::domain::webhook::ProviderTag;
use storefront_webhooks::ports::StorefrontStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let store = build_store(&config.database).await?;
    let reconciler = OrderReconciler::new(store, config.database.statement_timeout());

    let handlers = ProviderTag::ALL.into_iter().map(|tag| {
        let secret = config.webhooks.secret_for(tag);
        if secret.is_none() {
            warn!(provider = %tag, "No webhook secret configured; deliveries will be rejected");
        }
        HandleProviderWebhookHandler::new(tag.profile(), secret, reconciler.clone())
    });
    let state = WebhookAppState::new(handlers);

    let limits = HttpLimits {
        max_body_bytes: config.webhooks.max_body_bytes,
        request_timeout: config.server.request_timeout(),
    };
    let app = webhook_router(state, limits);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Storefront webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn build_store(config: &DatabaseConfig) -> Result<Arc<dyn StorefrontStore>, BoxError> {
    let credential: Option<SecretString> = config.credential();
    let credential = match credential {
        Some(credential) if config.is_configured() => credential,
        _ => {
            warn!("Database URL or service key missing; order storage will fail closed");
            return Ok(Arc::new(FailClosedStore::new(
                "storage credential not configured",
            )));
        }
    };

    let pool = connect_pool(config, &credential)?;
    if config.run_migrations {
        run_migrations(&pool).await?;
        info!("Database migrations applied");
    }

    Ok(Arc::new(PostgresStorefrontStore::new(pool)))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
