use serde::{Deserialize, Serialize};

use super::mode::CanonicalMode;
use super::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Prior turn sent as conversational context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// Body of `POST /chat` and `POST /chat/stream`
///
/// Both endpoints take the identical payload, which is what lets a stream
/// escalate to a synchronous request without rebuilding anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub thread_id: String,
    pub message: String,
    pub mode: CanonicalMode,
    pub image_base64: Option<String>,
    pub settings: Settings,
    pub history: Vec<HistoryEntry>,
}

/// One file part of a `POST /upload_documents` form
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl DocumentUpload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
