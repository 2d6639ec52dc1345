// src/test_utils/mock_llm_server.rs
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::post, Json, Router};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::core_types::LLMResponse;
use crate::errors::AssistantError;

type ScriptedResponse = Result<LLMResponse, AssistantError>;

#[derive(Clone)]
struct MockServerState {
    responses: Arc<Mutex<VecDeque<ScriptedResponse>>>,
    requests: Arc<Mutex<Vec<Value>>>,
    gemini_paths: Arc<Mutex<Vec<String>>>,
}

impl MockServerState {
    fn new(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
            gemini_paths: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn record_and_pop(&self, payload: Value) -> Option<ScriptedResponse> {
        log::debug!("Mock LLM server received request: {}", payload);
        self.requests.lock().unwrap().push(payload);
        self.responses.lock().unwrap().pop_front()
    }
}

fn error_message(err: &AssistantError) -> String {
    match err {
        AssistantError::LLMError(msg) => msg.clone(),
        other => other.to_string(),
    }
}

fn error_response(err: &AssistantError) -> Response {
    log::error!("Mock LLM server simulating an error: {:?}", err);
    let body = json!({ "error": { "code": 500, "message": error_message(err) } });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

fn exhausted() -> Response {
    log::error!("Mock LLM server ran out of responses!");
    StatusCode::SERVICE_UNAVAILABLE.into_response()
}

/// Answers `POST /v1/chat/completions` in the OpenAI chat completion format.
async fn chat_completions_handler(
    State(state): State<MockServerState>,
    Json(payload): Json<Value>,
) -> Response {
    match state.record_and_pop(payload) {
        Some(Ok(resp)) => {
            let mut body = json!({
                "id": "chatcmpl-mock",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": resp.content },
                    "finish_reason": resp.finish_reason.unwrap_or_else(|| "stop".to_string()),
                }],
            });
            if let Some(usage) = resp.usage {
                body["usage"] = json!(usage);
            }
            Json(body).into_response()
        }
        Some(Err(e)) => error_response(&e),
        None => exhausted(),
    }
}

/// Answers `POST /v1beta/models/<model>:generateContent` in the Gemini wire format.
async fn gemini_handler(
    State(state): State<MockServerState>,
    Path(rest): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    state.gemini_paths.lock().unwrap().push(rest);
    match state.record_and_pop(payload) {
        Some(Ok(resp)) => {
            let mut candidate = json!({ "finishReason": resp.finish_reason.unwrap_or_else(|| "STOP".to_string()) });
            if let Some(text) = resp.content {
                candidate["content"] = json!({ "role": "model", "parts": [{ "text": text }] });
            }
            Json(json!({ "candidates": [candidate] })).into_response()
        }
        Some(Err(e)) => error_response(&e),
        None => exhausted(),
    }
}

pub struct MockLLMServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    recorded_requests: Arc<Mutex<Vec<Value>>>,
    gemini_paths: Arc<Mutex<Vec<String>>>,
}

impl MockLLMServer {
    pub async fn start(responses: Vec<ScriptedResponse>) -> Self {
        let state = MockServerState::new(responses);
        let recorded_requests = state.requests.clone();
        let gemini_paths = state.gemini_paths.clone();

        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions_handler))
            .route("/v1beta/models/{*rest}", post(gemini_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap_or_else(|e| {
            panic!("Failed to bind mock server to 127.0.0.1:0. Error: {}", e);
        });
        let addr = listener.local_addr().unwrap();
        log::info!("Mock LLM server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| {
                    log::error!("Mock LLM server error: {}", e);
                });
        });

        MockLLMServer {
            addr,
            shutdown_tx,
            recorded_requests,
            gemini_paths,
        }
    }

    pub fn address(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Base URL to hand to a Gemini client pointed at this server.
    pub fn gemini_base_url(&self) -> String {
        format!("{}/v1beta", self.address())
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("Mock LLM server shutdown signal already sent or receiver dropped.");
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    }

    /// Request bodies in arrival order.
    pub fn get_requests(&self) -> Vec<Value> {
        self.recorded_requests.lock().unwrap().clone()
    }

    /// Path suffixes after `/v1beta/models/` seen by the Gemini route.
    pub fn gemini_paths(&self) -> Vec<String> {
        self.gemini_paths.lock().unwrap().clone()
    }
}
