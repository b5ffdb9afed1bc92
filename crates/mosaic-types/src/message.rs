use chrono::{SecondsFormat, Utc};
use mosaic_client::{CanonicalMode, Role, ToolRecord};
use serde::{Deserialize, Serialize};

/// Fresh, time-ordered identifier for threads and mutable messages
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// One entry of a conversation thread
///
/// Only streaming placeholders carry an `id`; everything else is immutable
/// once appended. `message_mode` is absent on data written before messages
/// were tagged, which the view filters tolerate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub content: String,
    /// Local path of a user-supplied image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Server-produced image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tools: Vec<ToolRecord>,
    pub timestamp: String,
    #[serde(rename = "messageMode", default, skip_serializing_if = "Option::is_none")]
    pub message_mode: Option<CanonicalMode>,
    #[serde(rename = "isStreaming", default)]
    pub is_streaming: bool,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: None,
            role,
            content: content.into(),
            image: None,
            image_url: None,
            tools: Vec::new(),
            timestamp: now_rfc3339(),
            message_mode: None,
            is_streaming: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Empty assistant message that receives deltas in place
    pub fn streaming_placeholder(mode: CanonicalMode) -> Self {
        Self {
            id: Some(new_id()),
            is_streaming: true,
            ..Self::assistant(String::new()).with_mode(mode)
        }
    }

    pub fn with_mode(mut self, mode: CanonicalMode) -> Self {
        self.message_mode = Some(mode);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolRecord>) -> Self {
        self.tools = tools;
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn has_image_tool(&self) -> bool {
        self.tools.iter().any(ToolRecord::is_image)
    }

    /// True when this message is the one addressed by `id`
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_streaming_with_id() {
        let msg = Message::streaming_placeholder(CanonicalMode::Rag);
        assert!(msg.is_streaming);
        assert!(msg.id.is_some());
        assert!(msg.content.is_empty());
        assert_eq!(msg.message_mode, Some(CanonicalMode::Rag));
        assert_eq!(msg.role, Role::Assistant);
    }

    #[test]
    fn test_snapshot_key_names() {
        let msg = Message::user("hi").with_mode(CanonicalMode::ImageAnalyze);
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["messageMode"], "image-analyze");
        assert_eq!(json["isStreaming"], false);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_untagged_legacy_message_loads() {
        let json = r#"{"role":"assistant","content":"old","timestamp":"2024-01-01T00:00:00.000Z","image_url":"http://x/a.png"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();

        assert!(msg.message_mode.is_none());
        assert!(!msg.is_streaming);
        assert!(msg.tools.is_empty());
        assert_eq!(msg.image_url.as_deref(), Some("http://x/a.png"));
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}
