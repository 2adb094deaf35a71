//! Session lifecycle phases.

use serde::{Deserialize, Serialize};

/// Where the session currently sits in the find → select → export flow.
///
/// Every collaborator call transitions the phase forward; every failure
/// rolls it back to the last stable phase (`Idle` or `ChunkSelected`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Nothing in flight, no candidates.
    #[default]
    Idle,
    /// Resolving the origin address to a coordinate.
    Geocoding,
    /// Waiting on the chunk-discovery collaborator.
    DiscoveringChunks,
    /// Candidates are on the map, none selected yet.
    ChunksReady,
    /// Waiting on the observation collaborator for the selected chunk.
    FetchingObservations,
    /// A chunk is selected and its observations (possibly none) are loaded.
    ChunkSelected,
}
