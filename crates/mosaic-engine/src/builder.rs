use anyhow::{anyhow, Context, Result};
use mosaic_client::http::DEFAULT_BASE_URL;
use mosaic_client::{Backend, Settings};
use mosaic_persist::{MemorySnapshot, SnapshotStore, ThreadStore};
use std::sync::Arc;

use crate::engine::Engine;

/// Builder for constructing an [`Engine`] with optional components
pub struct EngineBuilder {
    backend: Option<Arc<dyn Backend>>,
    snapshot: Option<Arc<dyn SnapshotStore>>,
    settings: Settings,
    base_url: String,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            snapshot: None,
            settings: Settings::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set the backend client (required)
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Where threads are loaded from and saved to; in-memory if unset
    pub fn snapshot(mut self, snapshot: Arc<dyn SnapshotStore>) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Backend address quoted in transport error messages
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Restore threads from the snapshot, creating a first thread if none
    pub async fn build(self) -> Result<Engine> {
        let backend = self
            .backend
            .ok_or_else(|| anyhow!("Backend is required. Use .backend()"))?;
        let snapshot = self
            .snapshot
            .unwrap_or_else(|| Arc::new(MemorySnapshot::new()));

        let threads = snapshot.load().await.context("Failed to load thread snapshot")?;
        let mut store = ThreadStore::from_threads(threads);
        store.ensure_default();

        tracing::info!(
            threads = store.len(),
            active = ?store.active_id(),
            "Engine ready"
        );

        Ok(Engine::new(backend, snapshot, store, self.settings, self.base_url))
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
