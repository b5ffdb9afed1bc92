use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tool::ToolRecord;

/// Body of a successful `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tools: Vec<ToolRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body of `POST /upload_documents`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub method: Option<String>,
}

impl UploadResponse {
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: i64,
    pub image_url: String,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

/// Body of `GET /gallery`, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryResponse {
    #[serde(default)]
    pub gallery: Vec<GalleryItem>,
    #[serde(default)]
    pub total: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryClearResponse {
    pub status: String,
    #[serde(default)]
    pub deleted_count: usize,
}

/// Server-side conversation memory for a thread
///
/// Entries are left as raw JSON because the server also keeps system and
/// tool messages there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<Value>,
    #[serde(default)]
    pub count: usize,
}
