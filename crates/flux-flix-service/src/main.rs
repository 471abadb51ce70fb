//! Catalog service entry point.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration (`flux-flix.yaml` + environment)
//! 3. Open the bike store (memory or `PostgreSQL`)
//! 4. Seed sample bikes, once
//! 5. Serve HTTP until `Ctrl-C`

use std::sync::Arc;

use flux_flix_service::config::ServiceConfig;
use flux_flix_service::seed::seed_bikes;
use flux_flix_service::server::cancel_on_ctrl_c;
use flux_flix_service::{AppState, CatalogService, open_store, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the server itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("flux-flix-service starting");

    // 2. Load configuration.
    let config = ServiceConfig::load()?;
    info!(
        host = config.server.host,
        port = config.server.port,
        event_interval_ms = config.events.interval_ms,
        database = config.database.url.is_some(),
        seed_enabled = config.seed.enabled,
        "Configuration loaded"
    );

    // 3. Open the bike store.
    let store = open_store(&config.database).await?;
    info!(backend = store.backend_name(), "Bike store ready");

    // 4. Seed sample data.
    if config.seed.enabled {
        let bikes = seed_bikes(&store, config.seed.names.as_slice()).await?;
        info!(count = bikes.len(), "Sample bikes loaded");
    }

    // 5. Serve until Ctrl-C.
    let catalog = CatalogService::new(store, config.events.interval());
    let state = Arc::new(AppState::new(catalog));
    cancel_on_ctrl_c(state.shutdown().clone());

    start_server(&config.server, state).await?;

    info!("flux-flix-service shutdown complete");
    Ok(())
}
