pub mod types;
pub mod traits;
pub mod streaming;
pub mod buffer_utils;
pub mod config;
pub mod http;

pub use traits::{Backend, ChatBackend, DocumentBackend, GalleryBackend, HistoryBackend};

pub use streaming::{FramePayload, FrameStream, StreamEvent};
pub use buffer_utils::{parse_frame_stream, CircularLineBuffer, FrameDecoder};
pub use config::{BackendConfig, BackendFactory};
pub use http::HttpBackend;
pub use types::{
    CanonicalMode, ChatRequest, ChatResponse, DocumentUpload, GalleryItem, HistoryEntry,
    HistoryResponse, ImageSettings, Role, Settings, ToolRecord, UploadResponse,
};
