//! Local persistence for Chunk Scout: paths and the saved taxa selection.

pub mod category_store;
pub mod paths;

pub use category_store::CategoryStore;
pub use paths::ChunkScoutPaths;
