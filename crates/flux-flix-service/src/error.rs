//! Error types for the catalog HTTP layer.
//!
//! [`ApiError`] unifies all request failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flux_flix_db::DbError;

/// Errors that can occur while handling a catalog request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested bike does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The bike store could not be reached or failed.
    #[error("store error: {0}")]
    Store(#[from] DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Store(e) => {
                tracing::error!(error = %e, "Bike store access failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("store error: {e}"))
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
