//! Chunk Scout core: the chunk exploration session.
//!
//! This crate holds everything with nontrivial invariants: the session
//! controller state machine, the deterministic random chunk selection, the
//! boundary export encoders, the debounced address lookup, and the map
//! layer command model. Network collaborators live behind the traits in
//! [`collaborators`]; `chunkscout-interaction` provides the HTTP
//! implementations.

pub mod collaborators;
pub mod debounce;
pub mod error;
pub mod export;
pub mod geo;
pub mod layers;
pub mod selection;
pub mod session;
pub mod taxa;

// Re-export common error type
pub use error::{ChunkScoutError, Result};
