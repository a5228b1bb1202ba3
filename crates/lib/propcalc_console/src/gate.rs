//! Auth gate: decides on every navigation whether a page may render and owns
//! the login and logout transitions.
//!
//! State starts `Unknown` and is resolved from the session store on the
//! first navigation. Auth failures published by the API client force the
//! gate to `Unauthenticated` and redirect to login.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, info, warn};

use propcalc_api_client::{ApiClient, ApiResult, AuthFailure};
use propcalc_core::models::UserSummary;

use crate::routes::Route;

/// Performs redirects decided by the gate.
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: &Route);
}

/// Navigator that records redirects, for headless shells and tests.
#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<Route>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Route> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.entries().pop()
    }
}

impl Navigator for History {
    fn redirect(&self, route: &Route) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.clone());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    Unknown,
    Authenticated(UserSummary),
    Unauthenticated,
}

/// Decision for a navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

pub struct AuthGate {
    client: ApiClient,
    navigator: Arc<dyn Navigator>,
    failures: broadcast::Receiver<AuthFailure>,
    state: GateState,
    current: Option<Route>,
}

impl AuthGate {
    pub fn new(client: ApiClient, navigator: Arc<dyn Navigator>) -> Self {
        let failures = client.subscribe_auth_failures();
        Self {
            client,
            navigator,
            failures,
            state: GateState::Unknown,
            current: None,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.current.as_ref()
    }

    pub fn current_user(&self) -> Option<&UserSummary> {
        match &self.state {
            GateState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Whether the current route may be shown.
    pub fn can_render(&self) -> bool {
        match (&self.state, &self.current) {
            (GateState::Unknown, _) | (_, None) => false,
            (GateState::Authenticated(_), Some(_)) => true,
            (GateState::Unauthenticated, Some(route)) => route.is_public(),
        }
    }

    /// Resolve a navigation against the session.
    pub fn navigate(&mut self, route: Route) -> Navigation {
        self.drain_auth_failures();

        let session = self.client.session();
        match (session.is_active(), session.current_user()) {
            (true, Some(user)) => {
                self.state = GateState::Authenticated(user);
                self.current = Some(route.clone());
                Navigation::Render(route)
            }
            (active, _) => {
                if active {
                    debug!("token present without cached user, treating as signed out");
                }
                self.state = GateState::Unauthenticated;
                if route.is_public() {
                    self.current = Some(route.clone());
                    Navigation::Render(route)
                } else {
                    debug!(route = %route, "redirecting to login");
                    self.redirect_to_login();
                    Navigation::Redirect(Route::Login)
                }
            }
        }
    }

    /// Authenticate and persist the session. On failure nothing is written
    /// and the gate stays signed out.
    pub async fn login(&mut self, username: &str, password: &str) -> ApiResult<UserSummary> {
        match self.client.auth().login(username, password).await {
            Ok(success) => {
                self.client.session().save(&success.token, &success.user)?;
                // Failures published before this session began are stale.
                self.discard_pending_failures();
                info!(email = %success.user.email, "signed in");
                self.state = GateState::Authenticated(success.user.clone());
                Ok(success.user)
            }
            Err(e) => {
                warn!(username, error = %e, "sign in failed");
                self.discard_pending_failures();
                self.state = GateState::Unauthenticated;
                Err(e)
            }
        }
    }

    /// End the session and go to login.
    pub fn logout(&mut self) {
        if let Err(e) = self.client.session().clear() {
            warn!(error = %e, "failed to clear session on logout");
        }
        self.state = GateState::Unauthenticated;
        info!("signed out");
        self.redirect_to_login();
    }

    /// Apply auth failures published so far. Returns whether any arrived.
    pub fn drain_auth_failures(&mut self) -> bool {
        let mut seen = false;
        loop {
            match self.failures.try_recv() {
                Ok(failure) => {
                    debug!(path = %failure.path, "auth failure");
                    seen = true;
                }
                Err(TryRecvError::Lagged(_)) => seen = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if seen {
            self.on_auth_failure();
        }
        seen
    }

    /// Wait for the next auth failure and apply it. `None` once the client
    /// is gone.
    pub async fn next_auth_failure(&mut self) -> Option<AuthFailure> {
        loop {
            match self.failures.recv().await {
                Ok(failure) => {
                    self.on_auth_failure();
                    return Some(failure);
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "auth failure receiver lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    fn on_auth_failure(&mut self) {
        self.state = GateState::Unauthenticated;
        if self.current.as_ref() == Some(&Route::Login) {
            return;
        }
        warn!("session ended by the backend, redirecting to login");
        self.redirect_to_login();
    }

    fn discard_pending_failures(&mut self) {
        while !matches!(
            self.failures.try_recv(),
            Err(TryRecvError::Empty | TryRecvError::Closed)
        ) {}
    }

    fn redirect_to_login(&mut self) {
        self.current = Some(Route::Login);
        self.navigator.redirect(&Route::Login);
    }
}
