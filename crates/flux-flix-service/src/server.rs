//! Catalog HTTP server lifecycle management.
//!
//! Provides [`start_server`] which binds to a TCP port and runs the Axum
//! server until the state's shutdown [`CancellationToken`] fires. Firing
//! the token also ends every open event stream, so graceful shutdown does
//! not wait on long-lived SSE connections.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::ServerSettings;
use crate::router::build_router;
use crate::state::AppState;

/// Start the catalog HTTP server.
///
/// Binds to the configured address, builds the router, and serves
/// requests until shutdown is requested. Returns `Ok(())` on clean
/// shutdown.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind or the server
/// encounters a fatal I/O error.
pub async fn start_server(
    settings: &ServerSettings,
    state: Arc<AppState>,
) -> Result<(), ServerError> {
    let listener = bind(settings).await?;
    serve(listener, state).await
}

/// Bind a listener for `settings`.
///
/// The host may be an IPv4 or bare IPv6 address (`::`) or a name such as
/// `localhost`; names are resolved and the first address that binds wins.
pub async fn bind(settings: &ServerSettings) -> Result<TcpListener, ServerError> {
    let host = settings.host.as_str();
    TcpListener::bind((host, settings.port))
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {host}:{}: {e}", settings.port)))
}

/// Serve the catalog router on an already bound listener.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<(), ServerError> {
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;
    let shutdown = state.shutdown().clone();
    let router = build_router(state);

    info!(%addr, "Catalog server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    info!(%addr, "Catalog server stopped");
    Ok(())
}

/// Cancel `token` when the process receives `Ctrl-C`.
pub fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received, shutting down"),
            Err(e) => tracing::warn!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
        }
        token.cancel();
    });
}

/// Errors that can occur when starting or running the catalog server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn settings(host: &str) -> ServerSettings {
        ServerSettings {
            host: host.to_owned(),
            port: 0,
        }
    }

    #[tokio::test]
    async fn bind_resolves_host_names() {
        let listener = bind(&settings("localhost")).await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn bind_accepts_plain_ipv4() {
        let listener = bind(&settings("127.0.0.1")).await.unwrap();
        assert!(listener.local_addr().unwrap().is_ipv4());
    }

    #[tokio::test]
    async fn bind_rejects_unresolvable_host() {
        let result = bind(&settings("no such host.invalid")).await;
        assert!(matches!(result, Err(ServerError::Bind(_))));
    }
}
