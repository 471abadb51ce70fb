//! Shared application state for the catalog server.
//!
//! [`AppState`] is wrapped in [`Arc`](std::sync::Arc) and injected via
//! Axum's `State` extractor. It carries no per-request data.

use tokio_util::sync::CancellationToken;

use crate::catalog::CatalogService;

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    /// Catalog operations.
    pub catalog: CatalogService,
}

impl AppState {
    /// Create application state around a catalog.
    pub const fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }

    /// Token that stops the server and every open event stream.
    pub const fn shutdown(&self) -> &CancellationToken {
        self.catalog.shutdown_token()
    }
}
