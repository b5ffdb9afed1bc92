use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalized operation kind understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CanonicalMode {
    Chat,
    ImageGen,
    ImageAnalyze,
    Rag,
}

impl Default for CanonicalMode {
    fn default() -> Self {
        CanonicalMode::Chat
    }
}

impl CanonicalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::ImageGen => "image-gen",
            Self::ImageAnalyze => "image-analyze",
            Self::Rag => "rag",
        }
    }

    /// Modes the backend can answer over `/chat/stream`
    pub fn supports_streaming(&self) -> bool {
        matches!(self, Self::Chat | Self::Rag | Self::ImageAnalyze)
    }
}

impl fmt::Display for CanonicalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(Self::Chat),
            "image-gen" => Ok(Self::ImageGen),
            "image-analyze" => Ok(Self::ImageAnalyze),
            "rag" => Ok(Self::Rag),
            other => anyhow::bail!("Unknown mode: {}", other),
        }
    }
}
