//! Configuration loading and typed config structures for the catalog service.
//!
//! Configuration lives in an optional YAML file (`flux-flix.yaml` by
//! default). Every field has a default, so the service runs with no file
//! at all. Environment variables override the file:
//!
//! | Variable | Field |
//! |---|---|
//! | `FLUX_FLIX_CONFIG` | path of the YAML file itself |
//! | `FLUX_FLIX_HOST` | `server.host` |
//! | `FLUX_FLIX_PORT` | `server.port` |
//! | `FLUX_FLIX_EVENT_INTERVAL_MS` | `events.interval_ms` |
//! | `DATABASE_URL` | `database.url` |

use std::num::ParseIntError;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "flux-flix.yaml";

/// Names inserted by the seeder when none are configured.
pub const DEFAULT_BIKE_NAMES: [&str; 4] = ["Canyon", "Trek SL5", "Giant", "Trek SL6"];

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {name}: {value:?} ({reason})")]
    InvalidEnv {
        /// The environment variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A value parsed but is not usable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Event stream pacing.
    #[serde(default)]
    pub events: EventsConfig,

    /// Bike store selection.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Startup fixture data.
    #[serde(default)]
    pub seed: SeedConfig,
}

impl ServiceConfig {
    /// Load configuration the way the service binary does.
    ///
    /// Reads the file named by `FLUX_FLIX_CONFIG` (or
    /// [`DEFAULT_CONFIG_PATH`]) if it exists, otherwise starts from
    /// defaults, then applies environment overrides and validates.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("FLUX_FLIX_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
        let path = Path::new(&path);

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_yml::from_str(&contents)?
        } else {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without consulting the
    /// environment.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its
    /// value when set.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("FLUX_FLIX_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("FLUX_FLIX_PORT") {
            self.server.port = port.parse().map_err(|e: ParseIntError| ConfigError::InvalidEnv {
                name: "FLUX_FLIX_PORT",
                value: port.clone(),
                reason: e.to_string(),
            })?;
        }
        if let Some(interval) = lookup("FLUX_FLIX_EVENT_INTERVAL_MS") {
            self.events.interval_ms =
                interval.parse().map_err(|e: ParseIntError| ConfigError::InvalidEnv {
                    name: "FLUX_FLIX_EVENT_INTERVAL_MS",
                    value: interval.clone(),
                    reason: e.to_string(),
                })?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        Ok(())
    }

    /// Reject values that parse but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.events.interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "events.interval_ms must be greater than zero".to_owned(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Address or host name to bind to (e.g. `0.0.0.0`, `::`, `localhost`).
    #[serde(default = "default_host")]
    pub host: String,

    /// The TCP port to listen on. `0` picks a free port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Event stream pacing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventsConfig {
    /// Milliseconds between consecutive events, and before the first one.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl EventsConfig {
    /// The configured interval as a [`Duration`].
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

/// Bike store selection.
///
/// With no URL the service keeps bikes in memory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string.
    #[serde(default)]
    pub url: Option<String>,

    /// Connection pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

/// Startup fixture data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedConfig {
    /// Whether to replace the store contents on startup.
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,

    /// Names to insert, in order.
    #[serde(default = "default_seed_names")]
    pub names: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
            names: default_seed_names(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

const fn default_interval_ms() -> u64 {
    1000
}

const fn default_max_connections() -> u32 {
    flux_flix_db::postgres::DEFAULT_MAX_CONNECTIONS
}

const fn default_seed_enabled() -> bool {
    true
}

fn default_seed_names() -> Vec<String> {
    DEFAULT_BIKE_NAMES.iter().map(|&name| name.to_owned()).collect()
}
