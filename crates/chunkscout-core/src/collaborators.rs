//! Collaborator traits.
//!
//! These abstract the network services the controller drives: forward
//! geocoding, drive-time chunk discovery, and observation retrieval.
//! The core is agnostic to transport; `chunkscout-interaction` provides the
//! HTTP implementations and tests provide in-memory mocks.

use crate::error::Result;
use crate::geo::{AddressCandidate, BoundingBox, Coordinate, Observation};
use async_trait::async_trait;

/// Forward geocoding: address text to ranked coordinate candidates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Returns up to `limit` ranked candidates for the query, or an empty
    /// list when nothing matches.
    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<AddressCandidate>>;

    /// Returns the single best match for the query, if any.
    async fn best_match(&self, query: &str) -> Result<Option<AddressCandidate>> {
        Ok(self.suggest(query, 1).await?.into_iter().next())
    }
}

/// Drive-time chunk discovery.
///
/// May fail with a rate-limit-flavored error, which implementations must
/// surface as [`ChunkScoutError::RateLimited`](crate::error::ChunkScoutError)
/// or a `Collaborator` error with status 429 so the controller can emit a
/// tailored message.
#[async_trait]
pub trait ChunkDiscovery: Send + Sync {
    /// Returns the grid-aligned chunks reachable from `origin` within the
    /// drive-time budget that pass the taxa filter.
    async fn discover(
        &self,
        origin: Coordinate,
        drive_time_minutes: u32,
        chunk_size_km2: f64,
        taxa_filter: Option<&str>,
    ) -> Result<Vec<BoundingBox>>;
}

/// Observation retrieval for a bounding box.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Returns the observations inside `bounds` matching the filter.
    async fn observations_in(
        &self,
        bounds: BoundingBox,
        taxa_filter: Option<&str>,
    ) -> Result<Vec<Observation>>;
}
