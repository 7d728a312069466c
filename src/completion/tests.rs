use std::sync::Arc;

use axum::{Json, Router, extract::State, http::HeaderMap, http::StatusCode, routing::post};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use super::*;
use crate::constants::ANTHROPIC_VERSION;

fn sample_image() -> ImageSource {
    ImageSource::base64("image/png", "iVBORw0KGgo=")
}

#[test]
fn test_vision_request_wire_shape() {
    let request = CompletionRequest::vision("model-x", &sample_image(), "Leggi", 3000, 0.0);
    let wire = serde_json::to_value(&request).unwrap();

    assert_eq!(wire["model"], "model-x");
    assert_eq!(wire["max_tokens"], 3000);
    assert_eq!(wire["messages"][0]["role"], "user");

    let content = wire["messages"][0]["content"].as_array().unwrap();
    assert_eq!(content.len(), 2);
    assert_eq!(content[0]["type"], "image");
    assert_eq!(content[0]["source"]["type"], "base64");
    assert_eq!(content[0]["source"]["media_type"], "image/png");
    assert!(content[0]["source"].get("url").is_none());
    assert_eq!(content[1], json!({ "type": "text", "text": "Leggi" }));
}

#[test]
fn test_image_source_keeps_unknown_fields() {
    let raw = json!({ "type": "base64", "media_type": "image/jpeg", "data": "AAAA", "hint": "scan" });
    let source: ImageSource = serde_json::from_value(raw.clone()).unwrap();

    assert_eq!(source.extra.get("hint"), Some(&json!("scan")));
    assert_eq!(serde_json::to_value(&source).unwrap(), raw);
}

#[test]
fn test_request_prompt_returns_text_part() {
    let request = CompletionRequest::vision("m", &sample_image(), "Quale argomento?", 100, 0.0);
    assert_eq!(request.prompt(), Some("Quale argomento?"));
}

#[test]
fn test_first_text_reads_first_block() {
    let response: CompletionResponse = serde_json::from_value(json!({
        "id": "msg_1",
        "content": [
            { "type": "text", "text": "primo" },
            { "type": "text", "text": "secondo" }
        ]
    }))
    .unwrap();

    assert_eq!(response.first_text(), Some("primo"));
    assert_eq!(response.extra.get("id"), Some(&json!("msg_1")));
}

#[test]
fn test_first_text_absent_for_non_text_block() {
    let response: CompletionResponse = serde_json::from_value(json!({
        "content": [{ "type": "tool_use", "id": "t1" }]
    }))
    .unwrap();
    assert_eq!(response.first_text(), None);

    let empty: CompletionResponse = serde_json::from_value(json!({})).unwrap();
    assert!(empty.content.is_empty());
    assert_eq!(empty.first_text(), None);
}

#[tokio::test]
async fn test_mock_replays_in_order_and_records() {
    let mock = MockCompletionService::new();
    mock.push_text("uno").push_text("due");

    let request = CompletionRequest::vision(mock.model(), &sample_image(), "p", 10, 0.0);
    let first = mock.complete(&request).await.unwrap();
    let second = mock.complete(&request).await.unwrap();
    let third = mock.complete(&request).await;

    assert_eq!(first.first_text(), Some("uno"));
    assert_eq!(second.first_text(), Some("due"));
    assert!(matches!(third, Err(CompletionError::Status { status: 503, .. })));
    assert_eq!(mock.request_count(), 3);
}

#[tokio::test]
async fn test_mock_unconfigured_refuses_calls() {
    let mock = MockCompletionService::unconfigured();
    assert!(!mock.is_configured());

    let request = CompletionRequest::vision(mock.model(), &sample_image(), "p", 10, 0.0);
    assert!(matches!(
        mock.complete(&request).await,
        Err(CompletionError::MissingCredential)
    ));
    assert_eq!(mock.request_count(), 0);
}

#[test]
fn test_client_debug_redacts_key() {
    let client = AnthropicClient::with_client(
        reqwest::Client::new(),
        "https://api.example.test/",
        Some("sk-secret".to_string()),
        "model-x",
    );
    let rendered = format!("{client:?}");

    assert!(!rendered.contains("sk-secret"));
    assert!(rendered.contains("<redacted>"));
    assert!(rendered.contains("https://api.example.test\""));
}

#[tokio::test]
async fn test_client_without_key_fails_before_network() {
    let client = AnthropicClient::with_client(
        reqwest::Client::new(),
        "http://127.0.0.1:9",
        None,
        "model-x",
    );
    assert!(!client.is_configured());

    let request = CompletionRequest::vision("model-x", &sample_image(), "p", 10, 0.0);
    assert!(matches!(
        client.complete(&request).await,
        Err(CompletionError::MissingCredential)
    ));
}

#[derive(Clone, Default)]
struct Captured {
    headers: Arc<Mutex<Vec<(String, String)>>>,
    body: Arc<Mutex<Option<Value>>>,
}

async fn spawn_messages_endpoint(status: StatusCode, reply: Value) -> (String, Captured) {
    let captured = Captured::default();

    let app = Router::new()
        .route(
            "/v1/messages",
            post(
                move |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| {
                    let reply = reply.clone();
                    async move {
                        for name in ["x-api-key", "anthropic-version"] {
                            if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
                                captured
                                    .headers
                                    .lock()
                                    .push((name.to_string(), value.to_string()));
                            }
                        }
                        *captured.body.lock() = Some(body);
                        (status, Json(reply))
                    }
                },
            ),
        )
        .with_state(captured.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), captured)
}

#[tokio::test]
async fn test_client_posts_with_headers() {
    let (url, captured) = spawn_messages_endpoint(
        StatusCode::OK,
        json!({ "content": [{ "type": "text", "text": "ok" }] }),
    )
    .await;

    let client = AnthropicClient::with_client(
        reqwest::Client::new(),
        &url,
        Some("sk-test".to_string()),
        "model-x",
    );
    let request = CompletionRequest::vision("model-x", &sample_image(), "ciao", 100, 0.0);
    let response = client.complete(&request).await.unwrap();

    assert_eq!(response.first_text(), Some("ok"));

    let headers = captured.headers.lock().clone();
    assert!(headers.contains(&("x-api-key".to_string(), "sk-test".to_string())));
    assert!(headers.contains(&("anthropic-version".to_string(), ANTHROPIC_VERSION.to_string())));

    let body = captured.body.lock().clone().unwrap();
    assert_eq!(body["model"], "model-x");
    assert_eq!(body["messages"][0]["content"][1]["text"], "ciao");
}

#[tokio::test]
async fn test_client_maps_error_status() {
    let (url, _captured) = spawn_messages_endpoint(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "type": "rate_limit_error" } }),
    )
    .await;

    let client = AnthropicClient::with_client(
        reqwest::Client::new(),
        &url,
        Some("sk-test".to_string()),
        "model-x",
    );
    let request = CompletionRequest::vision("model-x", &sample_image(), "ciao", 100, 0.0);

    match client.complete(&request).await {
        Err(CompletionError::Status { status, body }) => {
            assert_eq!(status, 429);
            assert!(body.contains("rate_limit_error"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}
