use anyhow::Context;
use base64::Engine as _;
use mosaic_client::{CanonicalMode, ChatRequest, HistoryEntry, Settings};
use mosaic_types::Message;
use std::path::Path;

use crate::error::{EngineError, Result};

/// Prior messages sent along as context
pub const HISTORY_LIMIT: usize = 10;

const ANALYZE_PLACEHOLDER: &str = "Analyze this image";

/// A user-supplied image, kept both as a local reference and as payload
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
    /// Where the image came from; stored on the user message
    pub path: String,
    /// Standard base64 without any data-URL prefix
    pub base64: String,
}

impl ImageInput {
    pub fn from_bytes(path: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            path: path.into(),
            base64: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        Ok(Self::from_bytes(path.display().to_string(), &bytes))
    }
}

/// Context for a new request: everything before the message just appended,
/// capped to the most recent [`HISTORY_LIMIT`], minus blank entries
pub fn recent_history(messages: &[Message]) -> Vec<HistoryEntry> {
    let prior = match messages.split_last() {
        Some((_, prior)) => prior,
        None => return Vec::new(),
    };
    let start = prior.len().saturating_sub(HISTORY_LIMIT);

    prior[start..]
        .iter()
        .filter(|m| !m.content.trim().is_empty())
        .map(|m| HistoryEntry {
            role: m.role,
            content: m.content.clone(),
        })
        .collect()
}

/// Assembles the payload shared by `/chat` and `/chat/stream`
pub struct RequestBuilder {
    thread_id: String,
    mode: CanonicalMode,
    text: String,
    image_base64: Option<String>,
    settings: Settings,
    history: Vec<HistoryEntry>,
}

impl RequestBuilder {
    pub fn new(thread_id: impl Into<String>, mode: CanonicalMode) -> Self {
        Self {
            thread_id: thread_id.into(),
            mode,
            text: String::new(),
            image_base64: None,
            settings: Settings::default(),
            history: Vec::new(),
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn image(mut self, image: Option<&ImageInput>) -> Self {
        self.image_base64 = image.map(|i| i.base64.clone());
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Take history from a thread whose last message is the one being sent
    pub fn history_from(mut self, messages: &[Message]) -> Self {
        self.history = recent_history(messages);
        self
    }

    pub fn build(self) -> Result<ChatRequest> {
        if self.text.trim().is_empty() && self.image_base64.is_none() {
            return Err(EngineError::EmptyInput);
        }

        let message = if self.text.is_empty() && self.mode == CanonicalMode::ImageAnalyze {
            ANALYZE_PLACEHOLDER.to_string()
        } else {
            self.text
        };

        Ok(ChatRequest {
            thread_id: self.thread_id,
            message,
            mode: self.mode,
            image_base64: self.image_base64,
            settings: self.settings,
            history: self.history,
        })
    }
}
