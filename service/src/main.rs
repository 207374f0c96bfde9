//! Cambio Quote Service Binary
//!
//! Fetches USD-BRL quotes from the upstream provider, persists them, and
//! serves them over HTTP under cascading deadline budgets.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cambio_common::QuoteError;
use cambio_service::provider::AwesomeApiProvider;
use cambio_service::server::{self, AppState};
use cambio_service::store::QuoteStore;
use cambio_service::{QuoteProcessor, QuoteServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting Cambio quote service");

    // Load configuration
    let config = QuoteServiceConfig::from_env();
    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    // Long-lived resources are constructed once here and handed by handle
    // into every request task.
    let store = QuoteStore::connect(&config.database_url).await?;
    store.init_schema().await?;

    let persisted = store.count().await?;
    info!(persisted_quotes = persisted, "Quote store ready");

    let http_client = reqwest::Client::builder()
        .build()
        .map_err(|e| QuoteError::RequestConstruction(e.to_string()))?;
    let provider = Arc::new(AwesomeApiProvider::new(http_client, &config.upstream_url)?);

    let processor = Arc::new(QuoteProcessor::new(
        provider,
        store,
        config.budgets.clone(),
    ));

    let bind_address = format!("{}:{}", config.listen_addr, config.listen_port);
    let listener = TcpListener::bind(&bind_address).await?;

    info!(
        bind_address = %bind_address,
        upstream_url = %config.upstream_url,
        request_budget_ms = config.budgets.request_budget.as_millis() as u64,
        persist_budget_ms = config.budgets.persist_budget.as_millis() as u64,
        "Configuration loaded"
    );

    server::run(listener, AppState { processor }).await?;

    info!("Quote service shutdown complete");
    Ok(())
}
