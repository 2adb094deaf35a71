//! Persisted taxa category selection.
//!
//! The selected category codes survive process restarts via an atomic TOML
//! file. Load failure is non-fatal and defaults to an empty selection.

use chunkscout_core::error::{ChunkScoutError, Result};
use chunkscout_core::taxa::TaxaSelection;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use tracing::warn;

/// On-disk shape of the persisted selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SavedCategories {
    /// Ordered category codes, insertion order preserved.
    categories: Vec<String>,
    /// When the selection was last written (RFC 3339).
    updated_at: Option<String>,
}

/// Store for the user's taxa category selection.
///
/// Writes go through a temporary file plus atomic rename, guarded by an
/// exclusive lock file, so a crash mid-write cannot corrupt the selection.
pub struct CategoryStore {
    path: PathBuf,
}

impl CategoryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the persisted selection.
    ///
    /// A missing, empty, or unreadable file yields the empty selection;
    /// persistence problems never block a session from starting.
    pub fn load(&self) -> TaxaSelection {
        match self.load_saved() {
            Ok(Some(saved)) => TaxaSelection::from_saved_categories(saved.categories),
            Ok(None) => TaxaSelection::new(),
            Err(err) => {
                warn!(error = %err, path = %self.path.display(), "failed to load saved categories");
                TaxaSelection::new()
            }
        }
    }

    /// Saves the current category selection atomically.
    pub fn save(&self, selection: &TaxaSelection) -> Result<()> {
        let saved = SavedCategories {
            categories: selection.categories().to_vec(),
            updated_at: Some(chrono::Utc::now().to_rfc3339()),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let _lock = FileLock::acquire(&self.path)?;

        let toml_string = toml::to_string_pretty(&saved)?;
        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn load_saved(&self) -> Result<Option<SavedCategories>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let saved: SavedCategories = toml::from_str(&content)?;
        Ok(Some(saved))
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self.path.parent().ok_or_else(|| {
            ChunkScoutError::io("Categories path has no parent directory")
        })?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| ChunkScoutError::io("Categories path has no file name"))?;
        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// A file lock guard that releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock_exclusive().map_err(|e| {
            ChunkScoutError::io(format!("Failed to acquire categories lock: {e}"))
        })?;

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the handle drops; removing the lock
        // file is best effort.
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> CategoryStore {
        CategoryStore::new(dir.path().join("categories.toml"))
    }

    #[test]
    fn save_and_load_round_trips_the_selection() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut selection = TaxaSelection::new();
        selection.toggle_category("Aves");
        selection.toggle_category("Fungi");
        store.save(&selection).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.categories(), ["Aves", "Fungi"]);
    }

    #[test]
    fn missing_file_defaults_to_empty_selection() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load().categories().is_empty());
    }

    #[test]
    fn corrupt_file_is_non_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("categories.toml");
        fs::write(&path, "this is { not toml").unwrap();

        let store = CategoryStore::new(path);
        assert!(store.load().categories().is_empty());
    }

    #[test]
    fn unknown_codes_are_dropped_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("categories.toml");
        fs::write(&path, "categories = [\"Aves\", \"Dragons\"]\n").unwrap();

        let store = CategoryStore::new(path);
        assert_eq!(store.load().categories(), ["Aves"]);
    }

    #[test]
    fn lock_file_is_cleaned_up_after_save() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&TaxaSelection::new()).unwrap();
        assert!(!dir.path().join("categories.lock").exists());
    }
}
