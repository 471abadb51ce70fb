//! Startup helpers shared by the service binary and the tests.
//!
//! - [`open_store`] picks the bike store backend from configuration.
//! - [`spawn_server`] binds eagerly, then serves on a background task and
//!   reports the bound address (useful with port `0`).

use std::net::SocketAddr;
use std::sync::Arc;

use flux_flix_db::{BikeStore, DbError, PgBikeStore, PostgresConfig, PostgresPool};
use tokio::task::JoinHandle;

use crate::config::{DatabaseConfig, ServerSettings};
use crate::server::{ServerError, bind, serve};
use crate::state::AppState;

/// Errors that can occur while bringing the service up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The bike store could not be opened.
    #[error("store error: {0}")]
    Store(#[from] DbError),

    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Open the bike store described by `config`.
///
/// Without a URL the store lives in memory. With a URL, connects to
/// `PostgreSQL` and runs pending migrations first.
pub async fn open_store(config: &DatabaseConfig) -> Result<BikeStore, StartupError> {
    let Some(url) = config.url.as_deref() else {
        tracing::info!("No database URL configured, using in-memory bike store");
        return Ok(BikeStore::in_memory());
    };

    let pg_config = PostgresConfig::new(url).with_max_connections(config.max_connections);
    let pool = PostgresPool::connect(&pg_config).await?;
    pool.run_migrations().await?;

    Ok(BikeStore::from(PgBikeStore::new(&pool)))
}

/// Spawn the catalog server on a background Tokio task.
///
/// The listener is bound before spawning, so address and bind failures
/// surface here rather than inside the task. The server stops when the
/// state's shutdown token is cancelled.
pub async fn spawn_server(
    settings: &ServerSettings,
    state: Arc<AppState>,
) -> Result<(SocketAddr, JoinHandle<()>), StartupError> {
    let listener = bind(settings).await?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;

    let handle = tokio::spawn(async move {
        if let Err(e) = serve(listener, state).await {
            tracing::error!(error = %e, "Catalog server exited with error");
        }
    });

    tracing::info!(%addr, "Catalog server spawned on background task");

    Ok((addr, handle))
}
