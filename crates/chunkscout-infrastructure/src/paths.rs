//! Unified path management for Chunk Scout configuration files.
//!
//! All persisted local state lives under the platform config directory
//! (e.g. `~/.config/chunkscout/` on Linux).

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for Chunk Scout.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/chunkscout/        # Config directory
/// └── categories.toml          # Persisted taxa category selection
/// ```
pub struct ChunkScoutPaths;

impl ChunkScoutPaths {
    /// Returns the Chunk Scout configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("chunkscout"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Path of the persisted taxa category selection.
    pub fn categories_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("categories.toml"))
    }
}
