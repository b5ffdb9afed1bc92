use futures::StreamExt;
use mockito::Matcher;
use mosaic_client::{
    CanonicalMode, ChatBackend, ChatRequest, DocumentBackend, DocumentUpload, GalleryBackend,
    HistoryBackend, HttpBackend, Settings, StreamEvent,
};
use serde_json::json;

fn request(mode: CanonicalMode) -> ChatRequest {
    ChatRequest {
        thread_id: "thread-1".to_string(),
        message: "Hello".to_string(),
        mode,
        image_base64: None,
        settings: Settings::default(),
        history: Vec::new(),
    }
}

#[tokio::test]
async fn test_chat_posts_payload_and_parses_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat")
        .match_body(Matcher::PartialJson(json!({
            "thread_id": "thread-1",
            "message": "Hello",
            "mode": "rag",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"content":"Hi","tools":[{"type":"rag","docs":["manual.pdf"]}]}"#)
        .create_async()
        .await;

    let backend = HttpBackend::new(server.url()).unwrap();
    let response = backend.chat(&request(CanonicalMode::Rag)).await.unwrap();

    assert_eq!(response.content, "Hi");
    assert_eq!(response.tools.len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_chat_non_success_status_is_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let backend = HttpBackend::new(server.url()).unwrap();
    let err = backend.chat(&request(CanonicalMode::Chat)).await.unwrap_err();

    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_chat_stream_decodes_frames() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/stream")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(concat!(
            "data: {\"content\":\"Hel\"}\n\n",
            "data: {\"content\":\"lo\"}\n\n",
            "data: {\"done\":true,\"full_content\":\"Hello\"}\n\n",
        ))
        .create_async()
        .await;

    let backend = HttpBackend::new(server.url()).unwrap();
    let mut stream = backend.chat_stream(&request(CanonicalMode::Chat)).await.unwrap();

    let mut events = Vec::new();
    while let Some(event) = stream.next().await {
        events.push(event.unwrap());
    }

    assert_eq!(events.len(), 3);
    assert_eq!(
        events[2],
        StreamEvent::Done {
            full_content: Some("Hello".to_string()),
            has_tools: false,
        }
    );
}

#[tokio::test]
async fn test_chat_stream_rejects_error_status_before_streaming() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/stream")
        .with_status(503)
        .create_async()
        .await;

    let backend = HttpBackend::new(server.url()).unwrap();
    assert!(backend.chat_stream(&request(CanonicalMode::Chat)).await.is_err());
}

#[tokio::test]
async fn test_upload_sends_multipart_form() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/upload_documents")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("name=\"thread_id\"".to_string()),
            Matcher::Regex("filename=\"notes.txt\"".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok","files":["notes.txt"],"method":"vector_store"}"#)
        .create_async()
        .await;

    let backend = HttpBackend::new(server.url()).unwrap();
    let response = backend
        .upload_documents(
            "thread-1",
            vec![DocumentUpload::new("notes.txt", b"hello".to_vec()).with_mime("text/plain")],
        )
        .await
        .unwrap();

    assert_eq!(response.files, vec!["notes.txt".to_string()]);
    assert_eq!(response.method.as_deref(), Some("vector_store"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gallery_endpoints() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/gallery")
        .match_query(Matcher::UrlEncoded("limit".to_string(), "10".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"gallery":[{"id":7,"image_url":"http://img/7.png","prompt":"a fox","model":"dall-e-3","size":"1024x1024"}],"total":1}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/gallery/7")
        .with_status(200)
        .with_body(r#"{"status":"deleted","remaining":0}"#)
        .create_async()
        .await;
    server
        .mock("DELETE", "/gallery")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"cleared","deleted_count":3}"#)
        .create_async()
        .await;

    let backend = HttpBackend::new(server.url()).unwrap();

    let items = backend.list_gallery(Some(10)).await.unwrap();
    assert_eq!(items[0].id, 7);
    assert_eq!(items[0].prompt.as_deref(), Some("a fox"));

    backend.delete_gallery_item(7).await.unwrap();
    delete.assert_async().await;

    assert_eq!(backend.clear_gallery().await.unwrap(), 3);
}

#[tokio::test]
async fn test_history_endpoints() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/history/thread-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"history":[{"role":"system","content":"You are an AI assistant."}],"count":1}"#)
        .create_async()
        .await;
    let clear = server
        .mock("DELETE", "/history/thread-1")
        .with_status(200)
        .with_body(r#"{"status":"cleared"}"#)
        .create_async()
        .await;

    let backend = HttpBackend::new(server.url()).unwrap();

    let history = backend.fetch_history("thread-1").await.unwrap();
    assert_eq!(history.count, 1);
    assert_eq!(history.history[0]["role"], "system");

    backend.clear_history("thread-1").await.unwrap();
    clear.assert_async().await;
}
