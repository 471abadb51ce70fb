//! Configuration for the demo client.
//!
//! All configuration is loaded from environment variables:
//!
//! - `FLUX_FLIX_BASE_URL` -- URL of the bikes resource
//!   (default `http://localhost:8080/bikes`)
//! - `FLUX_FLIX_TARGET_BIKE` -- name to watch, matched case-insensitively
//!   (default `Canyon`)

use crate::error::ClientError;

/// Default URL of the bikes resource.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/bikes";

/// Default bike name the demo watches.
pub const DEFAULT_TARGET_BIKE: &str = "Canyon";

/// Demo client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// URL of the bikes resource, without a trailing slash.
    pub base_url: String,
    /// Bike name to watch.
    pub target_bike: String,
}

impl ClientConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from `lookup`, which maps a variable name to its
    /// value when set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("FLUX_FLIX_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let base_url = base_url.trim_end_matches('/').to_owned();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "FLUX_FLIX_BASE_URL must be an http(s) URL, got {base_url:?}"
            )));
        }

        let target_bike =
            lookup("FLUX_FLIX_TARGET_BIKE").unwrap_or_else(|| DEFAULT_TARGET_BIKE.to_owned());
        if target_bike.trim().is_empty() {
            return Err(ClientError::Config(
                "FLUX_FLIX_TARGET_BIKE must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            base_url,
            target_bike,
        })
    }
}
