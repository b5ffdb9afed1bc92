use regex::Regex;
use std::sync::OnceLock;

/// A piece of message text, either plain or a markdown link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Link { text: String, url: String },
}

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link regex"))
}

/// Split `[text](url)` links out of message content for rendering
pub fn split_links(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in link_pattern().captures_iter(content) {
        let (Some(whole), Some(text), Some(url)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        if whole.start() > cursor {
            segments.push(Segment::Text(content[cursor..whole.start()].to_string()));
        }
        segments.push(Segment::Link {
            text: text.as_str().to_string(),
            url: url.as_str().to_string(),
        });
        cursor = whole.end();
    }

    if cursor < content.len() {
        segments.push(Segment::Text(content[cursor..].to_string()));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_segment() {
        assert_eq!(split_links("hello"), vec![Segment::Text("hello".to_string())]);
        assert!(split_links("").is_empty());
    }

    #[test]
    fn test_links_are_split_out() {
        let segments = split_links("See [the docs](https://example.com/a) and [more](http://x.y).");
        assert_eq!(
            segments,
            vec![
                Segment::Text("See ".to_string()),
                Segment::Link {
                    text: "the docs".to_string(),
                    url: "https://example.com/a".to_string()
                },
                Segment::Text(" and ".to_string()),
                Segment::Link {
                    text: "more".to_string(),
                    url: "http://x.y".to_string()
                },
                Segment::Text(".".to_string()),
            ]
        );
    }

    #[test]
    fn test_link_target_may_contain_spaces() {
        assert_eq!(
            split_links("[report](files/q3 summary.pdf)"),
            vec![Segment::Link {
                text: "report".to_string(),
                url: "files/q3 summary.pdf".to_string()
            }]
        );
    }

    #[test]
    fn test_unclosed_link_stays_text() {
        assert_eq!(
            split_links("[broken](http://x"),
            vec![Segment::Text("[broken](http://x".to_string())]
        );
    }
}
