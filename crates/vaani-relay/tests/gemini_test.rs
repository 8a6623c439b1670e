use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use futures_util::StreamExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use vaani_relay::{spawn_relay, GeminiGenerator, GenerationConfig, RelayError, RelayOptions, TextGenerator};
use vaani_types::{GenerationRequest, StreamEvent};

#[derive(Clone, Default)]
struct Upstream {
    last_body: Arc<Mutex<Option<Value>>>,
    last_key: Arc<Mutex<Option<String>>>,
    last_alt: Arc<Mutex<Option<String>>>,
}

fn sse_chunk(text: &str) -> String {
    format!(
        "data: {}\r\n\r\n",
        json!({ "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }] })
    )
}

async fn generate(
    State(upstream): State<Upstream>,
    Path(action): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    *upstream.last_body.lock().unwrap() = Some(body.clone());
    *upstream.last_key.lock().unwrap() = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *upstream.last_alt.lock().unwrap() = query.get("alt").cloned();

    let message = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    match (action.as_str(), message.as_str()) {
        ("broken-model:streamGenerateContent", _) => (
            StatusCode::BAD_REQUEST,
            [("content-type", "application/json")],
            json!({ "error": { "message": "model not found" } }).to_string(),
        ),
        (_, "fail midway") => (
            StatusCode::OK,
            [("content-type", "text/event-stream")],
            format!(
                "{}data: {}\r\n\r\n",
                sse_chunk("partial"),
                json!({ "error": { "code": 503, "message": "overloaded" } })
            ),
        ),
        _ => (
            StatusCode::OK,
            [("content-type", "text/event-stream")],
            format!(
                "{}{}{}",
                sse_chunk("Hel"),
                sse_chunk("lo"),
                sse_chunk(" world")
            ),
        ),
    }
}

async fn start_upstream() -> (String, Upstream) {
    let upstream = Upstream::default();
    let app = Router::new()
        .route("/v1beta/models/{action}", post(generate))
        .with_state(upstream.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), upstream)
}

fn generator(base_url: &str, model: &str) -> GeminiGenerator {
    let config = GenerationConfig {
        api_key: Some("test-key".to_string()),
        model: model.to_string(),
        base_url: base_url.to_string(),
        ..Default::default()
    };
    GeminiGenerator::new(reqwest::Client::new(), config).unwrap()
}

#[tokio::test]
async fn test_gemini_streams_deltas_in_order() {
    let (base_url, upstream) = start_upstream().await;
    let generator = generator(&base_url, "gemini-test");

    let request = GenerationRequest::new("hi")
        .unwrap()
        .with_language("Tamil");
    let deltas: Vec<String> = generator
        .stream(&request)
        .await
        .unwrap()
        .map(|item| item.unwrap())
        .collect()
        .await;

    assert_eq!(deltas, vec!["Hel", "lo", " world"]);
    assert_eq!(upstream.last_key.lock().unwrap().as_deref(), Some("test-key"));
    assert_eq!(upstream.last_alt.lock().unwrap().as_deref(), Some("sse"));

    let body = upstream.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
    let instruction = body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .unwrap();
    assert!(instruction.contains("Respond in Tamil."));
}

#[tokio::test]
async fn test_gemini_non_success_status_is_error() {
    let (base_url, _upstream) = start_upstream().await;
    let generator = generator(&base_url, "broken-model");

    let result = generator.stream(&GenerationRequest::new("hi").unwrap()).await;
    match result {
        Err(RelayError::Status { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("model not found"));
        }
        Err(other) => panic!("expected status error, got {:?}", other),
        Ok(_) => panic!("expected status error, got a stream"),
    }
}

#[tokio::test]
async fn test_relay_over_gemini_end_to_end() {
    let (base_url, _upstream) = start_upstream().await;
    let generator: Arc<dyn TextGenerator> = Arc::new(generator(&base_url, "gemini-test"));

    let mut rx = spawn_relay(
        generator,
        GenerationRequest::new("hi").unwrap(),
        RelayOptions::default(),
    );
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert_eq!(
        events,
        vec![
            StreamEvent::Token { text: "Hel".into() },
            StreamEvent::Token { text: "lo".into() },
            StreamEvent::Token {
                text: " world".into()
            },
            StreamEvent::Done {
                text: "Hello world".into()
            },
        ]
    );
}

#[tokio::test]
async fn test_relay_over_gemini_mid_stream_error() {
    let (base_url, _upstream) = start_upstream().await;
    let generator: Arc<dyn TextGenerator> = Arc::new(generator(&base_url, "gemini-test"));

    let mut rx = spawn_relay(
        generator,
        GenerationRequest::new("fail midway").unwrap(),
        RelayOptions::default(),
    );
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert_eq!(events.len(), 2);
    assert_eq!(events[0], StreamEvent::Token {
        text: "partial".into()
    });
    match &events[1] {
        StreamEvent::Error { message } => assert!(message.contains("overloaded")),
        other => panic!("expected error event, got {:?}", other),
    }
}
