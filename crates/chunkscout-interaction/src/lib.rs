//! HTTP implementations of the Chunk Scout collaborator traits.

pub mod chunk_service;
pub mod mapbox_geocoder;

pub use chunk_service::ChunkServiceClient;
pub use mapbox_geocoder::MapboxGeocoder;
