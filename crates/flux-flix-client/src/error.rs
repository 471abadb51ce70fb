//! Error types for the catalog client.

/// Errors that can occur while talking to the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or the response body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// A response or event payload was not valid JSON for the expected type.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The event stream was not valid server-sent events.
    #[error("event stream error: {0}")]
    Sse(#[from] crate::sse::SseError),

    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(String),
}
