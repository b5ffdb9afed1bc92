use mosaic_client::{
    CanonicalMode, ChatRequest, ChatResponse, HistoryEntry, Role, Settings, ToolRecord,
    UploadResponse,
};
use serde_json::json;

#[test]
fn test_chat_request_wire_shape() {
    let request = ChatRequest {
        thread_id: "t-1".to_string(),
        message: "Analyze this image".to_string(),
        mode: CanonicalMode::ImageAnalyze,
        image_base64: None,
        settings: Settings::default(),
        history: vec![HistoryEntry {
            role: Role::User,
            content: "earlier".to_string(),
        }],
    };

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["thread_id"], "t-1");
    assert_eq!(value["mode"], "image-analyze");
    assert_eq!(value["image_base64"], serde_json::Value::Null);
    assert_eq!(value["history"][0], json!({"role": "user", "content": "earlier"}));
    assert_eq!(value["settings"]["model"], "gpt-4o-mini");
}

#[test]
fn test_chat_response_with_tools() {
    let json = r#"{"content":"42","tools":[{"type":"tool","name":"get_item_price","result":"42"}]}"#;
    let response: ChatResponse = serde_json::from_str(json).unwrap();

    assert_eq!(response.content, "42");
    assert_eq!(response.tools, vec![ToolRecord::tool("get_item_price", "42")]);
    assert!(response.image_url.is_none());
}

#[test]
fn test_tool_record_variants() {
    let image: ToolRecord =
        serde_json::from_str(r#"{"type":"image","url":"http://x/1.png","prompt":"a cat"}"#).unwrap();
    assert!(image.is_image());

    let rag: ToolRecord = serde_json::from_str(r#"{"type":"rag","docs":["a.pdf"]}"#).unwrap();
    assert_eq!(rag, ToolRecord::rag(vec!["a.pdf".to_string()]));

    let json = serde_json::to_string(&ToolRecord::image("http://x/2.png")).unwrap();
    assert_eq!(json, r#"{"type":"image","url":"http://x/2.png"}"#);
}

#[test]
fn test_tool_result_may_be_structured() {
    let record: ToolRecord =
        serde_json::from_str(r#"{"type":"tool","name":"calculate_shipping","result":{"cost":5}}"#)
            .unwrap();
    match record {
        ToolRecord::Tool { result, .. } => assert_eq!(result["cost"], 5),
        _ => panic!("Expected Tool variant"),
    }
}

#[test]
fn test_upload_response_status() {
    let ok: UploadResponse =
        serde_json::from_str(r#"{"status":"ok","files":["a.pdf"],"method":"file_search"}"#).unwrap();
    assert!(!ok.is_error());
    assert!(ok.warnings.is_empty());

    let err: UploadResponse =
        serde_json::from_str(r#"{"status":"error","message":"unsupported format"}"#).unwrap();
    assert!(err.is_error());
    assert_eq!(err.message.as_deref(), Some("unsupported format"));
}
