//! Prelude module for convenient imports
//!
//! ```rust
//! use mosaic::prelude::*;
//! ```

pub use crate::{
    Backend, CanonicalMode, HttpBackend, Settings, StreamEvent,
    Message, Thread, ViewKind,
    JsonFileSnapshot, MemorySnapshot, SnapshotStore,
    Delivery, Engine, EngineBuilder, ImageInput, SendInput, SendOutcome,
};
