//! Authenticated HTTP client for the admin API.
//!
//! Attaches the session's bearer token to every request except `OPTIONS`
//! probes, decodes JSON bodies and turns non-success statuses into
//! [`ApiError`]s. A 401 clears the session and publishes an [`AuthFailure`]
//! before the error is returned. The client never retries and never
//! navigates.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use url::Url;

use propcalc_core::config::ConsoleConfig;
use propcalc_core::session::SessionStore;

use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::services::{
    AppConfigService, AuthService, ClauseService, PolicyService, ProfileService, PromoCodeService,
    TariffPresetService, UserService,
};

/// Capacity of the auth failure channel. Lagging receivers only lose
/// duplicates of the same condition.
const AUTH_FAILURE_CAPACITY: usize = 16;

/// Published once per request that came back with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    pub method: Method,
    pub path: String,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    base_url: Url,
    session: SessionStore,
    auth_failures: broadcast::Sender<AuthFailure>,
}

/// Shared client handle. Clones reuse the connection pool and session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl ApiClient {
    /// Client for the configured backend.
    pub fn new(config: &ConsoleConfig, session: SessionStore) -> ApiResult<Self> {
        Self::with_base_url(config.api_url.clone(), session)
    }

    pub fn with_base_url(base_url: Url, session: SessionStore) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()?;
        let (auth_failures, _) = broadcast::channel(AUTH_FAILURE_CAPACITY);

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                session,
                auth_failures,
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Receiver for auth failures published after subscribing.
    pub fn subscribe_auth_failures(&self) -> broadcast::Receiver<AuthFailure> {
        self.inner.auth_failures.subscribe()
    }

    // -----------------------------------------------------------------------
    // Services
    // -----------------------------------------------------------------------

    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    pub fn clauses(&self) -> ClauseService<'_> {
        ClauseService::new(self)
    }

    pub fn tariff_presets(&self) -> TariffPresetService<'_> {
        TariffPresetService::new(self)
    }

    pub fn app_configs(&self) -> AppConfigService<'_> {
        AppConfigService::new(self)
    }

    pub fn policies(&self) -> PolicyService<'_> {
        PolicyService::new(self)
    }

    pub fn promo_codes(&self) -> PromoCodeService<'_> {
        PromoCodeService::new(self)
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(self)
    }

    pub fn profile(&self) -> ProfileService<'_> {
        ProfileService::new(self)
    }

    // -----------------------------------------------------------------------
    // Verbs
    // -----------------------------------------------------------------------

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let req = self.request(Method::GET, path)?;
        self.send(req, Method::GET, path).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.request(Method::GET, path)?.query(query);
        self.send(req, Method::GET, path).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.request(Method::POST, path)?.json(body);
        self.send(req, Method::POST, path).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.request(Method::PUT, path)?.json(body);
        self.send(req, Method::PUT, path).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let req = self.request(Method::DELETE, path)?;
        self.send(req, Method::DELETE, path).await
    }

    /// `OPTIONS` probe, sent without credentials. Returns the status as-is.
    pub async fn probe(&self, path: &str) -> ApiResult<StatusCode> {
        let req = self.request(Method::OPTIONS, path)?;
        let resp = req.send().await?;
        debug!(method = "OPTIONS", path, status = resp.status().as_u16(), "probe");
        Ok(resp.status())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn url(&self, path: &str) -> ApiResult<Url> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self.url(path)?;
        let mut req = self.inner.http.request(method.clone(), url);
        if method != Method::OPTIONS
            && let Some(token) = self.inner.session.token()
        {
            req = req.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        Ok(req)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        method: Method,
        path: &str,
    ) -> ApiResult<T> {
        debug!(method = %method, path, "request");
        let resp = req.send().await.map_err(|e| {
            warn!(method = %method, path, error = %e, "request failed");
            ApiError::Transport(e)
        })?;
        let status = resp.status();
        debug!(method = %method, path, status = status.as_u16(), "response");

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(method, path);
            return Err(ApiError::Unauthorized);
        }

        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let body = ErrorBody::parse(&String::from_utf8_lossy(&bytes));
            warn!(method = %method, path, status = status.as_u16(), "request rejected");
            return Err(ApiError::from_status(status, path, body));
        }

        let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        Ok(serde_json::from_slice(raw)?)
    }

    fn handle_unauthorized(&self, method: Method, path: &str) {
        warn!(method = %method, path, "401 received, ending session");
        if let Err(e) = self.inner.session.clear() {
            warn!(error = %e, "failed to clear session after 401");
        }
        let failure = AuthFailure {
            method,
            path: path.to_string(),
        };
        if self.inner.auth_failures.send(failure).is_err() {
            debug!("no auth failure listeners");
        }
    }
}
