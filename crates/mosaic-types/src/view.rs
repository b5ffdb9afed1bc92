use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The per-mode panels a conversation can be shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    /// Everything in the thread
    #[default]
    Chat,
    ImageGen,
    ImageAnalyze,
    Rag,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::ImageGen => "image-gen",
            Self::ImageAnalyze => "image-analyze",
            Self::Rag => "rag",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(Self::Chat),
            "image-gen" => Ok(Self::ImageGen),
            "image-analyze" => Ok(Self::ImageAnalyze),
            "rag" => Ok(Self::Rag),
            other => anyhow::bail!("Unknown view: {}", other),
        }
    }
}
