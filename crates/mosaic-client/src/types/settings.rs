use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Send-time options forwarded verbatim to the backend
///
/// Field names follow the backend's camelCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub model: String,
    /// Sampling temperature, kept within `0.0..=2.0`
    pub temperature: f32,
    #[serde(rename = "enableRAG")]
    pub enable_rag: bool,
    pub enable_agent: bool,
    pub enable_streaming: bool,
    pub image_settings: ImageSettings,
    pub detailed_analysis: bool,
    pub enabled_tools: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub model: String,
    pub size: String,
    pub quality: String,
    pub style: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            model: "dall-e-3".to_string(),
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
            style: "vivid".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        let enabled_tools = ["get_item_price", "calculate_shipping", "book_meeting", "send_email"]
            .into_iter()
            .map(|name| (name.to_string(), true))
            .collect();

        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            enable_rag: true,
            enable_agent: true,
            enable_streaming: true,
            image_settings: ImageSettings::default(),
            detailed_analysis: true,
            enabled_tools,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_streaming(mut self, enabled: bool) -> Self {
        self.enable_streaming = enabled;
        self
    }

    pub fn with_agent(mut self, enabled: bool) -> Self {
        self.enable_agent = enabled;
        self
    }

    pub fn with_tool(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.enabled_tools.insert(name.into(), enabled);
        self
    }
}
