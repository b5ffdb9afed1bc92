use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::{new_id, Message};

/// An independent conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Thread {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn message(&self, message_id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.has_id(message_id))
    }

    pub fn message_mut(&mut self, message_id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.has_id(message_id))
    }

    /// The in-flight placeholder, if a response is still streaming
    pub fn streaming_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_streaming)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
