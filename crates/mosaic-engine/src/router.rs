use mosaic_client::CanonicalMode;
use mosaic_types::{Message, ViewKind};
use std::str::FromStr;

/// Top-level mode picked in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopMode {
    #[default]
    Chat,
    Photo,
    Rag,
}

/// What the photo mode does with the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhotoMode {
    #[default]
    Generate,
    Analyze,
}

impl FromStr for TopMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(Self::Chat),
            "photo" => Ok(Self::Photo),
            "rag" => Ok(Self::Rag),
            other => anyhow::bail!("Unknown mode: {}", other),
        }
    }
}

impl FromStr for PhotoMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generate" => Ok(Self::Generate),
            "analyze" => Ok(Self::Analyze),
            other => anyhow::bail!("Unknown photo mode: {}", other),
        }
    }
}

/// Collapse the UI selection into the mode sent on the wire
pub fn resolve_mode(top: TopMode, photo: PhotoMode) -> CanonicalMode {
    match (top, photo) {
        (TopMode::Photo, PhotoMode::Generate) => CanonicalMode::ImageGen,
        (TopMode::Photo, PhotoMode::Analyze) => CanonicalMode::ImageAnalyze,
        (TopMode::Rag, _) => CanonicalMode::Rag,
        (TopMode::Chat, _) => CanonicalMode::Chat,
    }
}

/// Decides whether a message belongs in a view
pub trait MessageFilter {
    fn includes(&self, message: &Message) -> bool;
}

/// Messages saved before they carried a mode tag are placed by shape: an
/// attached upload counts as image analysis and a server image as image
/// generation. The rag view has no such shape and only shows tagged messages.
impl MessageFilter for ViewKind {
    fn includes(&self, message: &Message) -> bool {
        match self {
            ViewKind::Chat => true,
            ViewKind::Rag => message.message_mode == Some(CanonicalMode::Rag),
            ViewKind::ImageGen => {
                message.message_mode == Some(CanonicalMode::ImageGen)
                    || message.has_image_tool()
                    || message.image_url.is_some()
            }
            ViewKind::ImageAnalyze => {
                message.message_mode == Some(CanonicalMode::ImageAnalyze)
                    || (message.is_user() && message.image.is_some())
            }
        }
    }
}

pub fn filter_messages(messages: &[Message], view: ViewKind) -> Vec<&Message> {
    messages.iter().filter(|m| view.includes(m)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_client::ToolRecord;

    #[test]
    fn test_resolve_mode() {
        assert_eq!(resolve_mode(TopMode::Photo, PhotoMode::Generate), CanonicalMode::ImageGen);
        assert_eq!(resolve_mode(TopMode::Photo, PhotoMode::Analyze), CanonicalMode::ImageAnalyze);
        assert_eq!(resolve_mode(TopMode::Rag, PhotoMode::Analyze), CanonicalMode::Rag);
        assert_eq!(resolve_mode(TopMode::Chat, PhotoMode::Analyze), CanonicalMode::Chat);
    }

    #[test]
    fn test_parse_ui_modes() {
        assert_eq!("photo".parse::<TopMode>().unwrap(), TopMode::Photo);
        assert_eq!("analyze".parse::<PhotoMode>().unwrap(), PhotoMode::Analyze);
        assert!("video".parse::<TopMode>().is_err());
    }

    #[test]
    fn test_rag_view_needs_tag() {
        let tagged = Message::assistant("a").with_mode(CanonicalMode::Rag);
        let untagged = Message::assistant("b");

        assert!(ViewKind::Rag.includes(&tagged));
        assert!(!ViewKind::Rag.includes(&untagged));
        assert!(ViewKind::Chat.includes(&untagged));
    }

    #[test]
    fn test_image_gen_view() {
        let tagged = Message::user("a fox").with_mode(CanonicalMode::ImageGen);
        let by_tool = Message::assistant("").with_tools(vec![ToolRecord::image("http://x/1.png")]);
        let legacy = Message::assistant("").with_image_url("http://x/2.png");
        let chat = Message::assistant("hi").with_mode(CanonicalMode::Chat);

        assert!(ViewKind::ImageGen.includes(&tagged));
        assert!(ViewKind::ImageGen.includes(&by_tool));
        assert!(ViewKind::ImageGen.includes(&legacy));
        assert!(!ViewKind::ImageGen.includes(&chat));
    }

    #[test]
    fn test_image_analyze_view() {
        let tagged = Message::assistant("a cat").with_mode(CanonicalMode::ImageAnalyze);
        let legacy_upload = Message::user("what is this").with_image("/tmp/cat.png");
        let assistant_with_image = Message::assistant("x").with_image("/tmp/cat.png");

        assert!(ViewKind::ImageAnalyze.includes(&tagged));
        assert!(ViewKind::ImageAnalyze.includes(&legacy_upload));
        assert!(!ViewKind::ImageAnalyze.includes(&assistant_with_image));
    }

    #[test]
    fn test_filter_keeps_order() {
        let messages = vec![
            Message::user("q1").with_mode(CanonicalMode::Rag),
            Message::user("q2").with_mode(CanonicalMode::Chat),
            Message::assistant("a1").with_mode(CanonicalMode::Rag),
        ];

        let contents: Vec<&str> = filter_messages(&messages, ViewKind::Rag)
            .into_iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["q1", "a1"]);
    }
}
