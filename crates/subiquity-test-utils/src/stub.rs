//! Stub installer backend for client tests.
//!
//! [`StubBackend`] serves an axum router on a Unix socket inside a temporary
//! directory. Every request is recorded verbatim; responses come from a
//! per-path table of [`CannedResponse`]s with a default for unknown paths.
//! The server is shut down and the socket removed when the stub is dropped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use tempfile::TempDir;
use tokio::net::UnixListener;
use tokio::sync::oneshot;

/// A request as received by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Raw (still percent-encoded) query string.
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// The request body parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }

    /// Raw query value for `key`, if present.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == key).then_some(v)
        })
    }
}

/// A response the stub sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
    /// Hold the response back this long, to imitate a long-poll.
    pub delay: Option<Duration>,
}

impl CannedResponse {
    /// 200 with the given raw body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    /// 200 with a JSON body.
    pub fn json(value: &serde_json::Value) -> Self {
        Self::ok(value.to_string())
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
        }
    }

    pub fn delayed(self, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..self
        }
    }
}

#[derive(Debug)]
struct StubState {
    requests: Mutex<Vec<RecordedRequest>>,
    routes: Mutex<HashMap<String, CannedResponse>>,
    fallback: Mutex<CannedResponse>,
}

/// A running stub backend.
pub struct StubBackend {
    socket_path: PathBuf,
    state: Arc<StubState>,
    shutdown: Option<oneshot::Sender<()>>,
    _temp_dir: TempDir,
}

impl StubBackend {
    /// Start a stub that answers every path with 200 `{"ok":true}`.
    pub async fn start() -> Self {
        Self::start_with_fallback(CannedResponse::ok(r#"{"ok":true}"#)).await
    }

    /// Start a stub whose unrouted paths answer with `fallback`.
    pub async fn start_with_fallback(fallback: CannedResponse) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let socket_path = temp_dir.path().join("subiquity.sock");
        let listener = UnixListener::bind(&socket_path).expect("failed to bind stub socket");

        let state = Arc::new(StubState {
            requests: Mutex::new(Vec::new()),
            routes: Mutex::new(HashMap::new()),
            fallback: Mutex::new(fallback),
        });
        let app = axum::Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Self {
            socket_path,
            state,
            shutdown: Some(shutdown_tx),
            _temp_dir: temp_dir,
        }
    }

    /// Path of the Unix socket the stub listens on.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Answer requests to `path` with `response`.
    ///
    /// `path` may carry a raw query (`/keyboard/steps?index=%220%22`); such
    /// routes take precedence over the bare path.
    pub fn route(&self, path: &str, response: CannedResponse) {
        self.state
            .routes
            .lock()
            .expect("stub routes poisoned")
            .insert(path.to_string(), response);
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("stub requests poisoned")
            .clone()
    }

    /// The most recent request. Panics if none was received.
    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("stub backend received no request")
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let path = uri.path().to_string();

    let response = {
        let routes = state.routes.lock().expect("stub routes poisoned");
        let with_query = uri.query().map(|q| format!("{path}?{q}"));
        match with_query
            .and_then(|key| routes.get(&key))
            .or_else(|| routes.get(&path))
        {
            Some(response) => response.clone(),
            None => state.fallback.lock().expect("stub fallback poisoned").clone(),
        }
    };

    state
        .requests
        .lock()
        .expect("stub requests poisoned")
        .push(RecordedRequest {
            method: method.to_string(),
            path,
            query: uri.query().map(str::to_string),
            content_type,
            body,
        });

    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, response.body)
}
