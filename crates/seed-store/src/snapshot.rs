//! JSONL snapshots of a [`MemoryStore`].
//!
//! One entity per line, in id order. Loading a snapshot that does not exist
//! yields an empty store, so the first run needs no setup.

use std::path::Path;

use crate::entity::Entity;
use crate::error::StoreError;
use crate::memory::MemoryStore;

impl MemoryStore {
    /// Restore a store from `path`, or start empty if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Snapshot` if the file exists but cannot be read or
    /// a line is not a valid entity.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "store: no snapshot, starting empty");
            return Ok(Self::new());
        }

        let snapshot_err = |source| StoreError::Snapshot {
            path: path.to_path_buf(),
            source,
        };
        let entities: Vec<Entity> = serde_jsonlines::json_lines(path)
            .map_err(snapshot_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(snapshot_err)?;
        tracing::debug!(path = %path.display(), count = entities.len(), "store: snapshot loaded");
        Ok(Self::from_entities(entities))
    }

    /// Write every entity to `path`, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Snapshot` if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let snapshot_err = |source| StoreError::Snapshot {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(snapshot_err)?;
        }
        serde_jsonlines::write_json_lines(path, self.all()).map_err(snapshot_err)?;
        tracing::debug!(path = %path.display(), count = self.len(), "store: snapshot saved");
        Ok(())
    }
}
