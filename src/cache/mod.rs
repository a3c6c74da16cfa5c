//! Local fallback cache for memory contents.
//!
//! A best-effort snapshot of the remote memory, persisted as a JSON array
//! under the fixed storage key [`crate::MEMORY_STORAGE_KEY`]. The dispatch
//! path never touches it; prompt assembly writes it through on a successful
//! fetch and reads it only when the remote store is unreachable (see
//! [`crate::prompt::bootstrap`]).

use crate::store::Memory;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File-backed snapshot of the memory list
#[derive(Debug, Clone)]
pub struct FallbackCache {
    path: PathBuf,
}

impl FallbackCache {
    /// Create a cache stored under `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let path = dir
            .into()
            .join(format!("{}.json", crate::MEMORY_STORAGE_KEY));
        Self { path }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached memory.
    ///
    /// A missing file is an empty memory; an unreadable or malformed file
    /// logs a warning and also yields empty. Never fails the caller.
    pub fn load(&self) -> Memory {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("failed to read memory cache {}: {e}", self.path.display());
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(memory) => memory,
            Err(e) => {
                warn!("failed to parse memory cache {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    /// Persist `memory`, replacing any previous snapshot. Best-effort:
    /// failures are logged and swallowed.
    pub fn save(&self, memory: &[String]) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("failed to create cache dir {}: {e}", parent.display());
                return;
            }
        }

        let raw = match serde_json::to_string(memory) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("failed to serialize memory cache: {e}");
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, raw) {
            warn!("failed to write memory cache {}: {e}", self.path.display());
        }
    }
}
