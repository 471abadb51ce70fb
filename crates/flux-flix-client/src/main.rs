//! Demo client entry point.
//!
//! Finds the target bike in the catalog and prints each of its events to
//! stdout until the service closes the stream or `Ctrl-C` is pressed.

use flux_flix_client::{CatalogClient, ClientConfig, watch_bikes};
use futures::StreamExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the catalog cannot be
/// reached.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = ClientConfig::from_env()?;
    info!(
        base_url = config.base_url,
        target = config.target_bike,
        "flux-flix-client starting"
    );

    let client = CatalogClient::new(config.base_url.as_str());
    let mut events = watch_bikes(&client, &config.target_bike).await?;

    loop {
        tokio::select! {
            item = events.next() => match item {
                Some(Ok(event)) => println!("{event}"),
                Some(Err(e)) => warn!(error = %e, "Skipping event"),
                None => {
                    info!("Event streams closed");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    Ok(())
}
