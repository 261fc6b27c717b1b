//! Shared helpers for integration tests: a mock ChatKit upstream and a
//! router wired to it.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use coach_api::AppState;
use coach_api::config::ApiConfig;
use coach_core::config::ChatKitConfig;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;

pub const API_KEY: &str = "sk-integration-test";
pub const WORKFLOW_ID: &str = "wf_growth_coach";

/// A request the mock upstream received.
#[derive(Debug, Clone)]
pub struct Seen {
    pub path: String,
    pub authorization: Option<String>,
    pub beta: Option<String>,
    pub body: Value,
}

/// Canned upstream answer.
#[derive(Debug, Clone)]
pub enum Upstream {
    Json(StatusCode, Value),
    Text(StatusCode, &'static str),
}

impl IntoResponse for Upstream {
    fn into_response(self) -> Response {
        match self {
            Upstream::Json(status, body) => (status, axum::Json(body)).into_response(),
            Upstream::Text(status, body) => {
                (status, [(header::CONTENT_TYPE, "text/html")], body).into_response()
            }
        }
    }
}

#[derive(Clone)]
struct MockState {
    session: Upstream,
    conversation: Upstream,
    seen: Arc<Mutex<Vec<Seen>>>,
}

/// Mock ChatKit API on an ephemeral port.
pub struct MockChatKit {
    pub base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
    handle: JoinHandle<()>,
}

impl MockChatKit {
    pub async fn start(session: Upstream, conversation: Upstream) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(respond).with_state(MockState {
            session,
            conversation,
            seen: seen.clone(),
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            seen,
            handle,
        }
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    /// Router configured with the test workflow and API key against this mock.
    pub fn app(&self) -> Router {
        app_with(ChatKitConfig::new(
            Some(WORKFLOW_ID.into()),
            Some(API_KEY.into()),
            Some(self.base_url.clone()),
        )
        .unwrap())
    }
}

impl Drop for MockChatKit {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.seen.lock().unwrap().push(Seen {
        path: uri.path().to_string(),
        authorization: get("authorization"),
        beta: get("openai-beta"),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    if uri.path() == "/v1/chatkit/sessions" {
        state.session.into_response()
    } else {
        state.conversation.into_response()
    }
}

/// Router with an arbitrary ChatKit configuration.
pub fn app_with(chatkit: ChatKitConfig) -> Router {
    let state = AppState::new(ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        chatkit,
    })
    .expect("build app state");
    coach_api::router(state)
}

/// Sends `body` to the relay endpoint, returning status and parsed JSON.
pub async fn post_chat(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/growth-coach")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();

    let resp = app.oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).expect("parse JSON");
    (status, json)
}
