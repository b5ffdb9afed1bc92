pub mod accumulator;
pub mod builder;
pub mod documents;
pub mod engine;
pub mod error;
pub mod request;
pub mod router;

pub use accumulator::{annotate_failure, IngestStep, StreamIngest, STREAM_CLOSED_EARLY};
pub use builder::EngineBuilder;
pub use documents::{DocumentRecord, UploadOutcome};
pub use engine::{Delivery, Engine, SendInput, SendOutcome};
pub use error::{EngineError, Result};
pub use request::{recent_history, ImageInput, RequestBuilder, HISTORY_LIMIT};
pub use router::{filter_messages, resolve_mode, MessageFilter, PhotoMode, TopMode};

// Re-export the pieces callers need alongside the engine
pub use mosaic_client::{Backend, CanonicalMode, GalleryItem, Settings};
pub use mosaic_types::{Message, Thread, ViewKind};
