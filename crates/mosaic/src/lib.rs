//! # Mosaic
//!
//! Client core for a multimodal assistant backend.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mosaic::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = Arc::new(HttpBackend::new("http://localhost:8000")?);
//!
//!     let engine = Engine::builder()
//!         .backend(backend)
//!         .snapshot(Arc::new(JsonFileSnapshot::new("data/threads.json")))
//!         .build()
//!         .await?;
//!
//!     let outcome = engine
//!         .send(SendInput::new("Hello!", CanonicalMode::Chat))
//!         .await?;
//!     println!("{}", outcome.reply.content);
//!
//!     engine.save().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`mosaic-client`**: backend wire types, frame decoding, HTTP client
//! - **`mosaic-types`**: messages, threads, views
//! - **`mosaic-persist`**: thread store, message reconciliation, snapshots
//! - **`mosaic-engine`**: send orchestration, streaming with fallback, documents and gallery

pub mod prelude;

pub use mosaic_client::{
    Backend, BackendConfig, BackendFactory, CanonicalMode, DocumentUpload, GalleryItem,
    HttpBackend, Settings, StreamEvent, ToolRecord,
};

pub use mosaic_types::{split_links, Message, Segment, Thread, ViewKind};

pub use mosaic_persist::{JsonFileSnapshot, MemorySnapshot, PersistError, SnapshotStore, ThreadStore};

pub use mosaic_engine::{
    resolve_mode, Delivery, DocumentRecord, Engine, EngineBuilder, EngineError, ImageInput,
    PhotoMode, SendInput, SendOutcome, TopMode, UploadOutcome,
};
