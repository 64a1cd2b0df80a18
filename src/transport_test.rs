use super::*;

// =============================================================
// parse_reply
// =============================================================

#[test]
fn parse_reply_success() {
    let body = serde_json::json!({ "reply": "Hello" }).to_string();
    assert_eq!(parse_reply(&body).unwrap(), "Hello");
}

#[test]
fn parse_reply_error_field_wins_over_reply() {
    let body = serde_json::json!({ "reply": "Hello", "error": "boom" }).to_string();
    assert!(matches!(parse_reply(&body), Err(ChatError::Application(e)) if e == "boom"));
}

#[test]
fn parse_reply_non_string_error_is_still_application() {
    let body = serde_json::json!({ "error": { "code": 500 } }).to_string();
    assert!(matches!(parse_reply(&body), Err(ChatError::Application(_))));
}

#[test]
fn parse_reply_missing_or_empty_reply() {
    assert!(matches!(parse_reply("{}"), Err(ChatError::MissingReply)));
    assert!(matches!(parse_reply(r#"{"reply":""}"#), Err(ChatError::MissingReply)));
    assert!(matches!(parse_reply(r#"{"reply":42}"#), Err(ChatError::MissingReply)));
    assert!(matches!(parse_reply("[]"), Err(ChatError::MissingReply)));
}

#[test]
fn parse_reply_not_json() {
    assert!(matches!(parse_reply("<html>502</html>"), Err(ChatError::Decode(_))));
    assert!(matches!(parse_reply(""), Err(ChatError::Decode(_))));
}

// =============================================================
// wire body
// =============================================================

#[test]
fn request_body_carries_prompt_only() {
    let body = serde_json::to_value(ChatRequest { prompt: "hi" }).unwrap();
    assert_eq!(body, serde_json::json!({ "prompt": "hi" }));
}

// =============================================================
// HttpTransport
// =============================================================

#[test]
fn http_transport_targets_chat_path() {
    let cfg = ClientConfig::default().with_base_url("http://shop.test/");
    let transport = HttpTransport::new(&cfg).unwrap();
    assert_eq!(transport.chat_url(), "http://shop.test/chat");
}

#[test]
fn empty_token_is_not_forwarded() {
    let transport = HttpTransport::new(&ClientConfig::default()).unwrap().with_token(Some(String::new()));
    assert!(transport.token.is_none());
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let cfg = ClientConfig::default().with_base_url(&format!("http://127.0.0.1:{port}"));
    let transport = HttpTransport::new(&cfg).unwrap();
    let err = transport.send_prompt("hi").await.unwrap_err();
    assert!(matches!(err, ChatError::Network(_)), "got {err:?}");
}
