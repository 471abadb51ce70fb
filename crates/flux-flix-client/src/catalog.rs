//! Typed HTTP client for the catalog service.
//!
//! All calls go through one shared [`reqwest::Client`]. No authentication
//! is sent.

use async_stream::stream;
use flux_flix_types::{Bike, BikeEvent, BikeId};
use futures::stream::BoxStream;
use reqwest::{Response, StatusCode, Url};
use tracing::debug;

use crate::error::ClientError;
use crate::sse::SseDecoder;

/// A live event subscription. Dropping it closes the connection.
pub type EventStream = BoxStream<'static, Result<BikeEvent, ClientError>>;

/// Client for the `/bikes` resource.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a client for the bikes resource at `base_url`
    /// (e.g. `http://localhost:8080/bikes`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client that reuses an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    /// URL of the bikes resource.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /bikes`.
    pub async fn list_bikes(&self) -> Result<Vec<Bike>, ClientError> {
        let response = self.get(&self.base_url).await?;
        Ok(response.json().await?)
    }

    /// `GET /bikes?name=`: bikes whose name matches exactly.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Bike>, ClientError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("name", name)])
            .send()
            .await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }

    /// `GET /bikes/{id}`. A 404 is `Ok(None)`.
    pub async fn get_bike(&self, id: &BikeId) -> Result<Option<Bike>, ClientError> {
        let url = self.bike_url(id, &[])?;
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response)?;
        Ok(Some(response.json().await?))
    }

    /// `GET /bikes/{id}/events`.
    ///
    /// Resolves once the response headers arrive. The returned stream yields
    /// one item per server-sent event and ends when the server closes the
    /// connection. A transport error is yielded once and ends the stream; a
    /// payload that fails to decode is yielded as an error and the stream
    /// continues.
    pub async fn stream_events(&self, id: &BikeId) -> Result<EventStream, ClientError> {
        let url = self.bike_url(id, &["events"])?;
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;
        let response = check_status(response)?;
        debug!(%url, "Event stream connected");

        let byte_stream = response.bytes_stream();

        Ok(Box::pin(stream! {
            let mut decoder = SseDecoder::new();

            for await chunk in byte_stream {
                match chunk {
                    Ok(bytes) => {
                        match decoder.push(&bytes) {
                            Ok(frames) => {
                                for frame in frames {
                                    yield serde_json::from_str::<BikeEvent>(&frame.data)
                                        .map_err(ClientError::from);
                                }
                            }
                            Err(e) => {
                                yield Err(ClientError::from(e));
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(ClientError::Http(e));
                        break;
                    }
                }
            }
        }))
    }

    /// `{base_url}/{id}/{tail...}`. The id is one path segment, so ids
    /// containing `/`, spaces or `%` are percent-encoded.
    fn bike_url(&self, id: &BikeId, tail: &[&str]) -> Result<Url, ClientError> {
        let base = &self.base_url;
        let mut url = Url::parse(base)
            .map_err(|e| ClientError::Config(format!("invalid base URL {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::Config(format!("base URL cannot hold a path: {base}")))?
            .push(id.as_str())
            .extend(tail);
        Ok(url)
    }

    async fn get(&self, url: &str) -> Result<Response, ClientError> {
        let response = self.client.get(url).send().await?;
        check_status(response)
    }
}

/// Map a non-success status to [`ClientError::Status`].
fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = CatalogClient::new("http://localhost:8080/bikes/");
        assert_eq!(client.base_url(), "http://localhost:8080/bikes");
    }

    #[test]
    fn bike_urls_keep_opaque_ids_in_one_segment() {
        let client = CatalogClient::new("http://localhost:8080/bikes");

        let plain = client.bike_url(&BikeId::from("507f1f77bcf86cd799439011"), &["events"]);
        assert_eq!(
            plain.unwrap().as_str(),
            "http://localhost:8080/bikes/507f1f77bcf86cd799439011/events"
        );

        let awkward = client.bike_url(&BikeId::from("trek sl5/a"), &[]);
        assert_eq!(awkward.unwrap().as_str(), "http://localhost:8080/bikes/trek%20sl5%2Fa");
    }

    #[test]
    fn bike_url_rejects_unusable_base() {
        let client = CatalogClient::new("not a url");
        let result = client.bike_url(&BikeId::from("abc"), &[]);
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
