//! In-process mock of the ChatKit API for unit tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::chatkit::{BETA_HEADER, SESSIONS_PATH};

/// One request as seen by the mock.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub path: String,
    pub authorization: Option<String>,
    pub beta: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

/// Canned response for one endpoint.
#[derive(Debug, Clone)]
pub(crate) struct Reply {
    status: StatusCode,
    body: ReplyBody,
    delay: Option<Duration>,
}

#[derive(Debug, Clone)]
enum ReplyBody {
    Json(Value),
    Text(&'static str),
}

impl Reply {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: ReplyBody::Json(body),
            delay: None,
        }
    }

    pub fn text(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body: ReplyBody::Text(body),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn into_response(self) -> Response {
        match self.body {
            ReplyBody::Json(v) => (self.status, axum::Json(v)).into_response(),
            ReplyBody::Text(t) => {
                (self.status, [(header::CONTENT_TYPE, "text/plain")], t).into_response()
            }
        }
    }
}

#[derive(Clone)]
struct MockState {
    session: Reply,
    conversation: Reply,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// Mock ChatKit server bound to an ephemeral localhost port.
pub(crate) struct MockChatKit {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    handle: JoinHandle<()>,
}

impl MockChatKit {
    /// Serves `session` for the sessions endpoint and `conversation` for
    /// everything else.
    pub async fn start(session: Reply, conversation: Reply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            session,
            conversation,
            requests: requests.clone(),
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            handle,
        }
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockChatKit {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(Recorded {
        path: uri.path().to_string(),
        authorization: header_str(header::AUTHORIZATION.as_str()),
        beta: header_str(&BETA_HEADER.to_ascii_lowercase()),
        content_type: header_str(header::CONTENT_TYPE.as_str()),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let reply = if uri.path() == SESSIONS_PATH {
        state.session
    } else {
        state.conversation
    };
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    reply.into_response()
}
