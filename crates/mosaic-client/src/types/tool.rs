use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record of work the backend did while answering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolRecord {
    /// A function tool call and its (usually stringified) result
    Tool {
        name: String,
        #[serde(default)]
        result: Value,
    },

    /// A generated image
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt: Option<String>,
    },

    /// Documents consulted by retrieval
    Rag {
        #[serde(default)]
        docs: Vec<String>,
    },
}

impl ToolRecord {
    pub fn tool(name: impl Into<String>, result: impl Into<Value>) -> Self {
        Self::Tool {
            name: name.into(),
            result: result.into(),
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::Image {
            url: url.into(),
            prompt: None,
        }
    }

    pub fn rag(docs: Vec<String>) -> Self {
        Self::Rag { docs }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}
