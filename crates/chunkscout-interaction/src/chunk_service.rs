//! ChunkServiceClient - chunk discovery and observation retrieval via the
//! Chunk Scout backend API.
//!
//! The backend owns the isochrone computation and the chunk-grid
//! generation; this client only consumes its results.

use async_trait::async_trait;
use chunkscout_core::collaborators::{ChunkDiscovery, ObservationSource};
use chunkscout_core::error::{ChunkScoutError, Result};
use chunkscout_core::geo::{BoundingBox, Coordinate, Observation};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Deadline for one observation request.
const OBSERVATION_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the chunk-service HTTP API.
#[derive(Clone)]
pub struct ChunkServiceClient {
    client: Client,
    base_url: String,
}

impl ChunkServiceClient {
    /// Creates a client against an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Creates a client against `CHUNKSCOUT_API_URL`, falling back to the
    /// local development server.
    pub fn from_env() -> Self {
        let base_url =
            env::var("CHUNKSCOUT_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChunkDiscovery for ChunkServiceClient {
    async fn discover(
        &self,
        origin: Coordinate,
        drive_time_minutes: u32,
        chunk_size_km2: f64,
        taxa_filter: Option<&str>,
    ) -> Result<Vec<BoundingBox>> {
        let body = FindChunksRequest {
            lat: origin.lat,
            lon: origin.lon,
            drivetime: drive_time_minutes,
            chunk_size: chunk_size_km2,
            taxa_filter: taxa_filter.map(str::to_string),
        };

        debug!(drivetime = drive_time_minutes, "requesting chunk discovery");
        let response = self
            .client
            .post(self.endpoint("/api/find-chunks"))
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read chunk-service error body".to_string());
            return Err(map_http_error(status, body));
        }

        let parsed: FindChunksResponse = response.json().await.map_err(|err| {
            ChunkScoutError::collaborator(
                None,
                format!("Failed to parse find-chunks response: {err}"),
            )
        })?;
        Ok(parsed.chunks)
    }
}

#[async_trait]
impl ObservationSource for ChunkServiceClient {
    async fn observations_in(
        &self,
        bounds: BoundingBox,
        taxa_filter: Option<&str>,
    ) -> Result<Vec<Observation>> {
        let body = ChunkObservationsRequest {
            chunk_bounds: bounds.into(),
            taxa_filter: taxa_filter.map(str::to_string),
        };

        let response = self
            .client
            .post(self.endpoint("/api/chunk-observations"))
            .timeout(OBSERVATION_REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read chunk-service error body".to_string());
            return Err(map_http_error(status, body));
        }

        let parsed: ChunkObservationsResponse = response.json().await.map_err(|err| {
            ChunkScoutError::collaborator(
                None,
                format!("Failed to parse chunk-observations response: {err}"),
            )
        })?;
        Ok(parsed
            .observations
            .into_iter()
            .map(ObservationRecord::into_observation)
            .collect())
    }
}

#[derive(Serialize)]
struct FindChunksRequest {
    lat: f64,
    lon: f64,
    drivetime: u32,
    #[serde(rename = "chunkSize")]
    chunk_size: f64,
    #[serde(rename = "taxaFilter")]
    taxa_filter: Option<String>,
}

#[derive(Deserialize)]
struct FindChunksResponse {
    chunks: Vec<BoundingBox>,
}

#[derive(Serialize)]
struct ChunkObservationsRequest {
    #[serde(rename = "chunkBounds")]
    chunk_bounds: [f64; 4],
    #[serde(rename = "taxaFilter")]
    taxa_filter: Option<String>,
}

#[derive(Deserialize)]
struct ChunkObservationsResponse {
    observations: Vec<ObservationRecord>,
}

#[derive(Deserialize)]
struct ObservationRecord {
    id: u64,
    species_guess: String,
    iconic_taxon_name: String,
    photo_url: Option<String>,
    observation_url: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl ObservationRecord {
    fn into_observation(self) -> Observation {
        // Null or out-of-range positions become coordinate-less records;
        // they are listed but never rendered as points.
        let coordinate = match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => Coordinate::new(lon, lat).ok(),
            _ => None,
        };
        Observation {
            id: self.id,
            species_guess: self.species_guess,
            iconic_taxon_name: self.iconic_taxon_name,
            photo_url: self.photo_url,
            observation_url: self.observation_url,
            coordinate,
        }
    }
}

#[derive(Deserialize)]
struct ServiceErrorBody {
    detail: String,
}

fn map_transport_error(err: reqwest::Error) -> ChunkScoutError {
    if err.is_timeout() {
        ChunkScoutError::Timeout {
            seconds: OBSERVATION_REQUEST_TIMEOUT.as_secs(),
        }
    } else {
        ChunkScoutError::collaborator(None, format!("Chunk service request failed: {err}"))
    }
}

fn map_http_error(status: StatusCode, body: String) -> ChunkScoutError {
    let message = serde_json::from_str::<ServiceErrorBody>(&body)
        .map(|wrapper| wrapper.detail)
        .unwrap_or_else(|_| body.clone());

    if status == StatusCode::TOO_MANY_REQUESTS || message.to_lowercase().contains("throttling") {
        ChunkScoutError::rate_limited(message)
    } else {
        ChunkScoutError::collaborator(Some(status.as_u16()), message)
    }
}
