//! Mock chat completion backend for integration tests
//!
//! Serves `/v1/chat/completions` with canned answers. The requested model
//! name selects the scenario:
//!
//! - `mock-empty`: a response with no choices
//! - `mock-error`: HTTP 500 with an OpenAI-style error body
//! - `mock-stream-error`: one streamed text delta, then an error event
//! - anything else: a text answer, or a tool call when tools were sent

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Text returned by the text scenario, also split into stream deltas
pub const ANSWER_DELTAS: [&str; 3] = ["Hello", " from", " mock"];

/// Mock chat completion backend
pub struct MockLlm {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockLlmState>,
}

#[derive(Default)]
struct MockLlmState {
    completion_count: AtomicU32,
    last_body: Mutex<Option<Value>>,
    last_authorization: Mutex<Option<String>>,
}

impl MockLlm {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(MockLlmState::default());

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL including `/v1`; the transport appends `/chat/completions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of completion requests received
    pub fn completion_count(&self) -> u32 {
        self.state.completion_count.load(Ordering::Relaxed)
    }

    /// Body of the most recent request
    pub fn last_body(&self) -> Option<Value> {
        self.state.last_body.lock().expect("lock poisoned").clone()
    }

    /// `Authorization` header of the most recent request
    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().expect("lock poisoned").clone()
    }
}

impl Drop for MockLlm {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_chat_completions(
    State(state): State<Arc<MockLlmState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.completion_count.fetch_add(1, Ordering::Relaxed);
    *state.last_authorization.lock().expect("lock poisoned") = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    *state.last_body.lock().expect("lock poisoned") = Some(body.clone());

    let model = body["model"].as_str().unwrap_or_default().to_owned();
    let stream = body["stream"].as_bool().unwrap_or(false);
    let has_tools = body.get("tools").is_some_and(|tools| !tools.is_null());

    match model.as_str() {
        "mock-error" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": {
                    "message": "mock server intentional failure",
                    "type": "server_error"
                }
            })),
        )
            .into_response(),
        "mock-empty" => Json(json!({
            "id": "chatcmpl-empty",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": model,
            "choices": []
        }))
        .into_response(),
        "mock-stream-error" => sse(&[
            chunk(&model, json!({"content": ANSWER_DELTAS[0]}), None),
            json!({
                "error": {
                    "message": "The server is overloaded",
                    "type": "server_error",
                    "code": null
                }
            }),
        ]),
        _ if stream => sse(&stream_chunks(&model, has_tools)),
        _ => Json(completion(&model, has_tools)).into_response(),
    }
}

fn completion(model: &str, has_tools: bool) -> Value {
    let (message, finish_reason) = if has_tools {
        (
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_test_123",
                    "type": "function",
                    "function": {"name": "get_weather", "arguments": "{\"location\":\"San Francisco\"}"}
                }]
            }),
            "tool_calls",
        )
    } else {
        (json!({"role": "assistant", "content": ANSWER_DELTAS.concat()}), "stop")
    };

    json!({
        "id": "chatcmpl-test-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "choices": [{"index": 0, "message": message, "finish_reason": finish_reason}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

fn chunk(model: &str, delta: Value, finish_reason: Option<&str>) -> Value {
    chunk_with_usage(model, delta, finish_reason, Value::Null)
}

fn chunk_with_usage(model: &str, delta: Value, finish_reason: Option<&str>, usage: Value) -> Value {
    json!({
        "id": "chatcmpl-test-stream",
        "object": "chat.completion.chunk",
        "created": 1_700_000_000,
        "model": model,
        "choices": [{"index": 0, "delta": delta, "finish_reason": finish_reason}],
        "usage": usage
    })
}

/// Chunk sequence for a streamed answer
///
/// The tool scenario interleaves two calls, starting with index 1. Usage
/// rides on the finishing chunk; the trailing choice-less usage chunk
/// reports different counts and must not win.
fn stream_chunks(model: &str, has_tools: bool) -> Vec<Value> {
    let mut chunks = vec![chunk(model, json!({"role": "assistant"}), None)];

    if has_tools {
        chunks.extend([
            chunk(
                model,
                json!({"tool_calls": [{"index": 1, "id": "call_b", "type": "function", "function": {"name": "get_time", "arguments": ""}}]}),
                None,
            ),
            chunk(
                model,
                json!({"tool_calls": [{"index": 0, "id": "call_a", "type": "function", "function": {"name": "get_weather", "arguments": "{\"location\":"}}]}),
                None,
            ),
            chunk(model, json!({"tool_calls": [{"index": 1, "function": {"arguments": "{\"zone\":\"CET\"}"}}]}), None),
            chunk(model, json!({"tool_calls": [{"index": 0, "function": {"arguments": "\"Paris\"}"}}]}), None),
            chunk_with_usage(model, json!({}), Some("tool_calls"), usage()),
        ]);
    } else {
        chunks.extend(ANSWER_DELTAS.iter().map(|text| chunk(model, json!({"content": text}), None)));
        chunks.push(chunk_with_usage(model, json!({}), Some("stop"), usage()));
    }

    chunks.push(json!({
        "id": "chatcmpl-test-stream",
        "object": "chat.completion.chunk",
        "created": 1_700_000_000,
        "model": model,
        "choices": [],
        "usage": {"prompt_tokens": 10, "completion_tokens": 40, "total_tokens": 50}
    }));

    chunks
}

fn usage() -> Value {
    json!({"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15})
}

/// Render chunks as an SSE body terminated by `[DONE]`
fn sse(chunks: &[Value]) -> Response {
    let mut body = String::from(": keep-alive\n\n");
    for chunk in chunks {
        body.push_str(&format!("data: {chunk}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");

    ([(header::CONTENT_TYPE, "text/event-stream")], body).into_response()
}
