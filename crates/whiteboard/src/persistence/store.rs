//! Snapshot storage backends

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, warn};

/// Opaque key-value storage for encoded snapshots
pub trait SnapshotStore {
    /// Store `blob` under `id`. Returns false if the store refused it.
    fn save(&mut self, id: &str, blob: &[u8]) -> bool;

    fn load(&self, id: &str) -> Option<Vec<u8>>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite a stored blob as-is
    pub fn insert_raw(&mut self, id: impl Into<String>, blob: Vec<u8>) {
        self.entries.insert(id.into(), blob);
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, id: &str, blob: &[u8]) -> bool {
        self.entries.insert(id.to_string(), blob.to_vec());
        true
    }

    fn load(&self, id: &str) -> Option<Vec<u8>> {
        self.entries.get(id).cloned()
    }
}

/// Directory of `<id>.json` files, one per session
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path for a session id; ids that could escape the directory are refused
    fn path_for(&self, id: &str) -> Option<PathBuf> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            warn!("Rejecting session id {:?}", id);
            return None;
        }
        Some(self.dir.join(format!("{id}.json")))
    }
}

impl SnapshotStore for FileStore {
    fn save(&mut self, id: &str, blob: &[u8]) -> bool {
        let Some(path) = self.path_for(id) else {
            return false;
        };
        if let Err(err) = fs::create_dir_all(&self.dir) {
            warn!("Failed to create {}: {}", self.dir.display(), err);
            return false;
        }
        match fs::write(&path, blob) {
            Ok(()) => {
                debug!("Wrote {} bytes to {}", blob.len(), path.display());
                true
            }
            Err(err) => {
                warn!("Failed to write {}: {}", path.display(), err);
                false
            }
        }
    }

    fn load(&self, id: &str) -> Option<Vec<u8>> {
        let path = self.path_for(id)?;
        match fs::read(&path) {
            Ok(blob) => Some(blob),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}", path.display());
                None
            }
            Err(err) => {
                warn!("Failed to read {}: {}", path.display(), err);
                None
            }
        }
    }
}
