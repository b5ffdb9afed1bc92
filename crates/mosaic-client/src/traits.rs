use crate::streaming::FrameStream;
use crate::types::{
    ChatRequest, ChatResponse, DocumentUpload, GalleryItem, HistoryResponse, UploadResponse,
};
use anyhow::Result;
use async_trait::async_trait;

/// Conversational endpoints
///
/// `chat` and `chat_stream` take the same payload; callers rely on that to
/// retry a stream synchronously.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Synchronous completion (`POST /chat`)
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Chunked completion (`POST /chat/stream`)
    ///
    /// Resolves once response headers arrive; the returned stream yields
    /// decoded frames in arrival order.
    async fn chat_stream(&self, request: &ChatRequest) -> Result<FrameStream>;
}

/// Retrieval corpus management
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    async fn upload_documents(
        &self,
        thread_id: &str,
        files: Vec<DocumentUpload>,
    ) -> Result<UploadResponse>;
}

/// Generated-image gallery
#[async_trait]
pub trait GalleryBackend: Send + Sync {
    async fn list_gallery(&self, limit: Option<usize>) -> Result<Vec<GalleryItem>>;

    async fn delete_gallery_item(&self, id: i64) -> Result<()>;

    /// Returns the number of removed entries
    async fn clear_gallery(&self) -> Result<usize>;
}

/// Server-side conversation memory
#[async_trait]
pub trait HistoryBackend: Send + Sync {
    async fn fetch_history(&self, thread_id: &str) -> Result<HistoryResponse>;

    async fn clear_history(&self, thread_id: &str) -> Result<()>;
}

/// Convenience trait for backends serving every endpoint
pub trait Backend: ChatBackend + DocumentBackend + GalleryBackend + HistoryBackend {}

impl<T> Backend for T where T: ChatBackend + DocumentBackend + GalleryBackend + HistoryBackend {}
