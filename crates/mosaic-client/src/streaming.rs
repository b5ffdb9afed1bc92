use anyhow::Result;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

pub use crate::buffer_utils::parse_frame_stream;

/// Ordered events decoded from a `/chat/stream` body
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Incremental text to append to the in-flight message
    Delta {
        content: String,
    },

    /// Terminator for the response
    Done {
        #[serde(skip_serializing_if = "Option::is_none")]
        full_content: Option<String>,
        /// Server needs tool calls and wants a synchronous re-request
        has_tools: bool,
    },

    /// Server-reported failure; ends the stream
    Error {
        message: String,
    },
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }
}

/// JSON object carried after the `data: ` prefix
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FramePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_tools: Option<bool>,
}

impl FramePayload {
    /// Events in processing order: an error wins outright, otherwise the
    /// delta comes before the terminator.
    pub fn into_events(self) -> Vec<StreamEvent> {
        if let Some(message) = self.error.filter(|m| !m.is_empty()) {
            return vec![StreamEvent::Error { message }];
        }

        let mut events = Vec::new();

        if let Some(content) = self.content.filter(|c| !c.is_empty()) {
            events.push(StreamEvent::Delta { content });
        }

        if self.done == Some(true) {
            events.push(StreamEvent::Done {
                full_content: self.full_content.filter(|c| !c.is_empty()),
                has_tools: self.has_tools.unwrap_or(false),
            });
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_takes_precedence() {
        let payload: FramePayload =
            serde_json::from_str(r#"{"error":"quota exceeded","done":true,"content":"x"}"#).unwrap();
        assert_eq!(
            payload.into_events(),
            vec![StreamEvent::Error {
                message: "quota exceeded".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_full_content_falls_back() {
        let payload: FramePayload =
            serde_json::from_str(r#"{"content":"","done":true,"full_content":""}"#).unwrap();
        assert_eq!(
            payload.into_events(),
            vec![StreamEvent::Done {
                full_content: None,
                has_tools: false
            }]
        );
    }

    #[test]
    fn test_tool_escalation_flag() {
        let payload: FramePayload =
            serde_json::from_str(r#"{"done":true,"has_tools":true,"message":"switching"}"#).unwrap();
        let events = payload.into_events();
        assert!(events[0].is_terminal());
        assert!(matches!(events[0], StreamEvent::Done { has_tools: true, .. }));
    }

    #[test]
    fn test_done_false_is_not_terminal() {
        let payload: FramePayload = serde_json::from_str(r#"{"content":"a","done":false}"#).unwrap();
        let events = payload.into_events();
        assert_eq!(events.len(), 1);
        assert!(!events[0].is_terminal());
    }
}
