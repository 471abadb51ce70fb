//! The demo flow: list, filter by name, then follow every match.

use flux_flix_types::Bike;
use futures::StreamExt;
use futures::future::try_join_all;
use tracing::{info, warn};

use crate::catalog::{CatalogClient, EventStream};
use crate::error::ClientError;

/// Bikes whose name equals `target`, ignoring case, in listing order.
pub fn matching_bikes(bikes: Vec<Bike>, target: &str) -> Vec<Bike> {
    let target = target.to_lowercase();
    bikes
        .into_iter()
        .filter(|bike| bike.name.to_lowercase() == target)
        .collect()
}

/// List all bikes, keep those named `target` and merge their event streams.
///
/// Every match gets its own connection; the merged stream interleaves them
/// in arrival order. With no match the stream is empty.
pub async fn watch_bikes(
    client: &CatalogClient,
    target: &str,
) -> Result<EventStream, ClientError> {
    let bikes = client.list_bikes().await?;
    let matches = matching_bikes(bikes, target);

    if matches.is_empty() {
        warn!(target, "No bike matches the target name");
    }
    for bike in &matches {
        info!(id = %bike.id, name = %bike.name, "Watching bike");
    }

    let streams = try_join_all(matches.iter().map(|bike| client.stream_events(&bike.id))).await?;
    Ok(futures::stream::select_all(streams).boxed())
}
