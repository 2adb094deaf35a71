//! MapboxGeocoder - forward geocoding via the Mapbox Places API.
//!
//! Configuration priority: explicit token > MAPBOX_ACCESS_TOKEN environment
//! variable.

use async_trait::async_trait;
use chunkscout_core::collaborators::Geocoder;
use chunkscout_core::error::{ChunkScoutError, Result};
use chunkscout_core::geo::{AddressCandidate, Coordinate};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::env;
use tracing::warn;

const BASE_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

/// Place types requested for address suggestions.
const SUGGESTION_TYPES: &str = "address,poi,place,locality,neighborhood";

/// Geocoder implementation that talks to the Mapbox HTTP API.
#[derive(Clone)]
pub struct MapboxGeocoder {
    client: Client,
    access_token: String,
    base_url: String,
}

impl MapboxGeocoder {
    /// Creates a new geocoder with the provided access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            access_token: access_token.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Loads the access token from the `MAPBOX_ACCESS_TOKEN` environment
    /// variable.
    pub fn try_from_env() -> Result<Self> {
        let access_token = env::var("MAPBOX_ACCESS_TOKEN").map_err(|_| {
            ChunkScoutError::validation(
                "MAPBOX_ACCESS_TOKEN not found in environment variables",
            )
        })?;
        Ok(Self::new(access_token))
    }

    /// Overrides the API base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builds the request URL with the query text as one percent-encoded
    /// path segment, so `#`, `?`, `/` and spaces in an address cannot
    /// corrupt the path.
    fn endpoint(&self, text: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|err| {
            ChunkScoutError::internal(format!("Invalid Mapbox base URL: {err}"))
        })?;
        url.path_segments_mut()
            .map_err(|_| ChunkScoutError::internal("Mapbox base URL cannot hold path segments"))?
            .push(&format!("{text}.json"));
        Ok(url)
    }

    async fn query(
        &self,
        text: &str,
        limit: usize,
        types: Option<&str>,
    ) -> Result<Vec<AddressCandidate>> {
        let url = self.endpoint(text)?;
        let limit = limit.to_string();
        let mut params = vec![
            ("access_token", self.access_token.as_str()),
            ("limit", limit.as_str()),
        ];
        if let Some(types) = types {
            params.push(("types", types));
        }

        let response = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Mapbox error body".to_string());
            return Err(map_http_error(status, body));
        }

        let parsed: GeocodeResponse = response.json().await.map_err(|err| {
            ChunkScoutError::collaborator(None, format!("Failed to parse Mapbox response: {err}"))
        })?;

        Ok(parsed
            .features
            .into_iter()
            .filter_map(|feature| match feature.into_candidate() {
                Ok(candidate) => Some(candidate),
                Err(err) => {
                    warn!(error = %err, "dropping geocode feature with invalid center");
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<AddressCandidate>> {
        self.query(query, limit, Some(SUGGESTION_TYPES)).await
    }

    async fn best_match(&self, query: &str) -> Result<Option<AddressCandidate>> {
        Ok(self.query(query, 1, None).await?.into_iter().next())
    }
}

#[derive(Deserialize)]
struct GeocodeResponse {
    features: Vec<GeocodeFeature>,
}

#[derive(Deserialize)]
struct GeocodeFeature {
    id: String,
    place_name: String,
    center: [f64; 2],
}

impl GeocodeFeature {
    fn into_candidate(self) -> Result<AddressCandidate> {
        Ok(AddressCandidate {
            id: self.id,
            display_name: self.place_name,
            center: Coordinate::new(self.center[0], self.center[1])?,
        })
    }
}

#[derive(Deserialize)]
struct MapboxErrorBody {
    message: String,
}

fn map_transport_error(err: reqwest::Error) -> ChunkScoutError {
    if err.is_timeout() {
        ChunkScoutError::Timeout { seconds: 30 }
    } else {
        ChunkScoutError::collaborator(None, format!("Mapbox request failed: {err}"))
    }
}

fn map_http_error(status: StatusCode, body: String) -> ChunkScoutError {
    let message = serde_json::from_str::<MapboxErrorBody>(&body)
        .map(|wrapper| wrapper.message)
        .unwrap_or_else(|_| body.clone());

    if status == StatusCode::TOO_MANY_REQUESTS {
        ChunkScoutError::rate_limited(message)
    } else {
        ChunkScoutError::collaborator(Some(status.as_u16()), message)
    }
}
