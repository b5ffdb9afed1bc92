use async_trait::async_trait;
use mosaic_types::Thread;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{PersistError, Result};

/// Load/save boundary for the full thread list
///
/// Saving an empty list is a no-op so a half-initialized session can never
/// wipe an existing snapshot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Previously saved threads, or an empty list if nothing was saved
    async fn load(&self) -> Result<Vec<Thread>>;

    async fn save(&self, threads: &[Thread]) -> Result<()>;
}

/// Snapshot kept as a JSON array in a single local file
pub struct JsonFileSnapshot {
    path: PathBuf,
}

impl JsonFileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshot {
    async fn load(&self) -> Result<Vec<Thread>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No snapshot yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let threads: Vec<Thread> = serde_json::from_str(&raw)?;
        tracing::debug!(path = %self.path.display(), threads = threads.len(), "Snapshot loaded");
        Ok(threads)
    }

    async fn save(&self, threads: &[Thread]) -> Result<()> {
        if threads.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(threads)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), threads = threads.len(), "Snapshot saved");
        Ok(())
    }
}

/// In-process snapshot, handy for tests and embedding
#[derive(Default)]
pub struct MemorySnapshot {
    threads: Mutex<Vec<Thread>>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threads(threads: Vec<Thread>) -> Self {
        Self {
            threads: Mutex::new(threads),
        }
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshot {
    async fn load(&self) -> Result<Vec<Thread>> {
        let threads = self
            .threads
            .lock()
            .map_err(|e| PersistError::Internal(e.to_string()))?;
        Ok(threads.clone())
    }

    async fn save(&self, threads: &[Thread]) -> Result<()> {
        if threads.is_empty() {
            return Ok(());
        }
        let mut stored = self
            .threads
            .lock()
            .map_err(|e| PersistError::Internal(e.to_string()))?;
        *stored = threads.to_vec();
        Ok(())
    }
}
