//! Scripted JSON-RPC node for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// One scripted answer
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with `result`, echoing the request id
    Result(Value),
    /// 200 with an `error` object, echoing the request id
    Error { code: i64, message: String },
    /// Non-2xx status with a plain body
    Status(u16, String),
    /// 200 with this exact body
    Raw(String),
}

#[derive(Default)]
struct NodeState {
    queue: Mutex<VecDeque<Reply>>,
    results: Mutex<HashMap<String, Value>>,
    requests: Mutex<Vec<Value>>,
}

/// Fake node bound to an ephemeral local port
pub struct FakeNode {
    url: String,
    state: Arc<NodeState>,
}

impl FakeNode {
    /// Bind and serve in the background
    pub async fn start() -> Self {
        let state = Arc::new(NodeState::default());
        let app = Router::new()
            .route("/", post(handle))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Answer the next request with `reply`, once
    pub fn push(&self, reply: Reply) {
        self.state.queue.lock().push_back(reply);
    }

    /// Answer every `method` request with `result` once the queue is empty
    pub fn set_result(&self, method: &str, result: Value) {
        self.state.results.lock().insert(method.to_string(), result);
    }

    /// Every envelope received, in order
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().len()
    }
}

async fn handle(State(state): State<Arc<NodeState>>, Json(request): Json<Value>) -> impl IntoResponse {
    state.requests.lock().push(request.clone());

    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request["method"].as_str().unwrap_or_default().to_string();

    let reply = state.queue.lock().pop_front().unwrap_or_else(|| {
        match state.results.lock().get(&method) {
            Some(result) => Reply::Result(result.clone()),
            None => Reply::Error {
                code: -32601,
                message: format!("the method {} does not exist/is not available", method),
            },
        }
    });

    let (status, body) = match reply {
        Reply::Result(result) => (
            StatusCode::OK,
            json!({"jsonrpc": "2.0", "id": id, "result": result}).to_string(),
        ),
        Reply::Error { code, message } => (
            StatusCode::OK,
            json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}})
                .to_string(),
        ),
        Reply::Status(code, body) => (
            StatusCode::from_u16(code).unwrap(),
            body,
        ),
        Reply::Raw(body) => (StatusCode::OK, body),
    };

    (status, [(header::CONTENT_TYPE, "application/json")], body)
}
