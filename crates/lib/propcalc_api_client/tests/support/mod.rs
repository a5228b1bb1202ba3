//! In-process mock of the admin backend.
//!
//! Every request is recorded; responses come from a per-test responder.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use url::Url;

use propcalc_api_client::ApiClient;
use propcalc_core::models::{UserId, UserSummary};
use propcalc_core::roles::Role;
use propcalc_core::session::{
    MemoryStorage, SessionError, SessionStorage, SessionStore, StorageOp,
};

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// Status plus optional JSON body.
pub struct Reply {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl Reply {
    pub fn json(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(body),
        }
    }

    pub fn status(status: StatusCode, body: Option<Value>) -> Self {
        Self { status, body }
    }

    pub fn empty() -> Self {
        Self {
            status: StatusCode::OK,
            body: None,
        }
    }
}

type Responder = Arc<dyn Fn(&Recorded) -> Reply + Send + Sync>;

#[derive(Clone)]
struct MockState {
    log: Arc<Mutex<Vec<Recorded>>>,
    responder: Responder,
}

pub struct MockBackend {
    pub addr: SocketAddr,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl MockBackend {
    /// Serve on an ephemeral port until the test runtime shuts down.
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&Recorded) -> Reply + Send + Sync + 'static,
    {
        let log = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            log: log.clone(),
            responder: Arc::new(responder),
        };
        let app = Router::new().fallback(handle).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });
        Self { addr, log }
    }

    pub fn base_url(&self) -> Url {
        format!("http://{}/", self.addr).parse().expect("base url")
    }

    pub fn client(&self, session: SessionStore) -> ApiClient {
        ApiClient::with_base_url(self.base_url(), session).expect("client")
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().expect("log").clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("at least one request")
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };
    let reply = (state.responder)(&recorded);
    state.log.lock().expect("log").push(recorded);
    match reply.body {
        Some(body) => (reply.status, axum::Json(body)).into_response(),
        None => reply.status.into_response(),
    }
}

/// Storage that counts batch writes.
#[derive(Debug, Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    pub writes: AtomicUsize,
}

impl CountingStorage {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl SessionStorage for CountingStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        self.inner.get(key)
    }

    fn write(&self, ops: Vec<StorageOp>) -> Result<(), SessionError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write(ops)
    }
}

pub fn admin() -> UserSummary {
    UserSummary {
        id: Some(UserId::from(1)),
        email: "admin@example.com".into(),
        full_name: Some("Ada Admin".into()),
        roles: vec![Role::Admin],
    }
}

/// In-memory session already holding `token`.
pub fn signed_in(token: &str) -> SessionStore {
    let session = SessionStore::in_memory();
    session.save(token, &admin()).expect("save session");
    session
}
