use futures::{stream, StreamExt};
use mosaic_client::{parse_frame_stream, FrameDecoder, StreamEvent};

const BODY: &str = concat!(
    "data: {\"content\":\"Hel\",\"done\":false}\n\n",
    "data: {\"content\":\"lo, \",\"done\":false}\n\n",
    "data: {\"content\":\"wörld\",\"done\":false}\n\n",
    "data: {\"content\":\"\",\"done\":true,\"full_content\":\"Hello, wörld\"}\n\n",
);

fn chunked(body: &[u8], size: usize) -> Vec<Result<Vec<u8>, std::io::Error>> {
    body.chunks(size).map(|c| Ok(c.to_vec())).collect()
}

async fn collect_events(chunks: Vec<Result<Vec<u8>, std::io::Error>>) -> Vec<StreamEvent> {
    let mut events = parse_frame_stream(stream::iter(chunks));
    let mut out = Vec::new();
    while let Some(event) = events.next().await {
        out.push(event.unwrap());
    }
    out
}

fn accumulated(events: &[StreamEvent]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Delta { content } => Some(content.as_str()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_reassembly_is_chunk_size_independent() {
    let whole = collect_events(chunked(BODY.as_bytes(), BODY.len())).await;

    for size in [1, 2, 3, 7, 16, 33] {
        let split = collect_events(chunked(BODY.as_bytes(), size)).await;
        assert_eq!(split, whole, "chunk size {}", size);
    }

    assert_eq!(accumulated(&whole), "Hello, wörld");
    assert_eq!(
        whole.last(),
        Some(&StreamEvent::Done {
            full_content: Some("Hello, wörld".to_string()),
            has_tools: false,
        })
    );
}

#[test]
fn test_complete_frames_processed_and_fragment_retained() {
    let frames = [
        "data: {\"content\":\"one\"}\n",
        "data: {\"content\":\"two\"}\n",
        "data: {\"content\":\"three\"}\n",
    ];
    let fragment = "data: {\"content\":\"fo";
    let body: String = frames.concat() + fragment;

    for size in [1, 5, 11, body.len()] {
        let mut decoder = FrameDecoder::new();
        let mut events = Vec::new();
        for chunk in body.as_bytes().chunks(size) {
            events.extend(decoder.push(chunk));
        }

        assert_eq!(events.len(), frames.len());
        assert_eq!(decoder.frames_processed(), frames.len());
        assert_eq!(decoder.pending(), fragment.as_bytes().to_vec());
    }
}

#[tokio::test]
async fn test_malformed_line_does_not_stop_later_frames() {
    let body = concat!(
        "data: {\"content\":\"a\"}\n",
        "data: {not valid json\n",
        "data: {\"content\":\"b\"}\n",
        "data: {\"done\":true}\n",
    );

    let events = collect_events(chunked(body.as_bytes(), 4)).await;

    assert_eq!(accumulated(&events), "ab");
    assert!(matches!(events.last(), Some(StreamEvent::Done { .. })));
}

#[tokio::test]
async fn test_residual_without_newline_is_parsed_at_close() {
    let body = "data: {\"content\":\"x\"}\ndata: {\"done\":true,\"has_tools\":true}";

    let events = collect_events(chunked(body.as_bytes(), 8)).await;

    assert_eq!(
        events,
        vec![
            StreamEvent::Delta { content: "x".to_string() },
            StreamEvent::Done { full_content: None, has_tools: true },
        ]
    );
}

#[tokio::test]
async fn test_transport_error_ends_stream() {
    let chunks: Vec<Result<Vec<u8>, std::io::Error>> = vec![
        Ok(b"data: {\"content\":\"partial\"}\n".to_vec()),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        Ok(b"data: {\"content\":\"never\"}\n".to_vec()),
    ];

    let mut events = parse_frame_stream(stream::iter(chunks));

    assert!(matches!(
        events.next().await,
        Some(Ok(StreamEvent::Delta { .. }))
    ));
    let err = events.next().await.unwrap().unwrap_err();
    assert!(err.to_string().contains("reset"));
    assert!(events.next().await.is_none());
}

#[test]
fn test_stream_event_serialization() {
    let event = StreamEvent::Delta {
        content: "Test".to_string(),
    };

    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"delta\""));
    assert!(json.contains("Test"));
}
