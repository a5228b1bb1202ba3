//! Mock admin backend and fixtures for console tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use url::Url;

use propcalc_api_client::ApiClient;
use propcalc_console::gate::History;
use propcalc_console::{Console, ViewContext};
use propcalc_core::models::{UserId, UserSummary};
use propcalc_core::roles::Role;
use propcalc_core::session::SessionStore;

static TRACING: Once = Once::new();

/// Log to the test writer; filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

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
    delay: Duration,
}

pub struct MockBackend {
    pub addr: SocketAddr,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl MockBackend {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&Recorded) -> Reply + Send + Sync + 'static,
    {
        Self::start_with_delay(Duration::ZERO, responder).await
    }

    /// Every reply is held back for `delay`.
    pub async fn start_with_delay<F>(delay: Duration, responder: F) -> Self
    where
        F: Fn(&Recorded) -> Reply + Send + Sync + 'static,
    {
        init_tracing();
        let log = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            log: log.clone(),
            responder: Arc::new(responder),
            delay,
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

    pub fn console(&self, session: SessionStore) -> (Console, Arc<History>) {
        let client = ApiClient::with_base_url(self.base_url(), session).expect("client");
        let history = Arc::new(History::new());
        (Console::with_client(client, history.clone()), history)
    }

    pub fn context(&self, session: SessionStore) -> ViewContext {
        self.console(session).0.context()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().expect("log").clone()
    }

    /// Requests with `method`, oldest first.
    pub fn with_method(&self, method: Method) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("at least one request")
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    _headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };
    let reply = (state.responder)(&recorded);
    state.log.lock().expect("log").push(recorded);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    match reply.body {
        Some(body) => (reply.status, axum::Json(body)).into_response(),
        None => reply.status.into_response(),
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

pub fn signed_in(token: &str) -> SessionStore {
    let session = SessionStore::in_memory();
    session.save(token, &admin()).expect("save session");
    session
}
