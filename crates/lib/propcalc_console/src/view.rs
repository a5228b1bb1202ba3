//! Shared view plumbing: context, mount scope, error mapping and the
//! confirmation step for destructive actions.

use std::future::Future;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use propcalc_api_client::{ApiClient, ApiError};
use propcalc_core::models::UserSummary;

use crate::notify::Notifications;
use crate::routes::Route;

/// Handles every view needs.
#[derive(Debug, Clone)]
pub struct ViewContext {
    pub client: ApiClient,
    pub notifications: Notifications,
}

impl ViewContext {
    pub fn new(client: ApiClient, notifications: Notifications) -> Self {
        Self {
            client,
            notifications,
        }
    }

    /// Signed-in user as cached in the session.
    pub fn current_user(&self) -> Option<UserSummary> {
        self.client.session().current_user()
    }

    /// Error toast for `err`. Expired sessions are left to the auth gate.
    pub fn report(&self, err: &ViewError, fallback: &str) {
        if let Some(message) = err.toast_message(fallback) {
            self.notifications.error(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Mount scope
// ---------------------------------------------------------------------------

/// Lifetime of a mounted view.
///
/// Work awaited through [`ViewScope::run`] yields `None` once the view is
/// unmounted, so late responses are dropped instead of applied.
#[derive(Debug, Default)]
pub struct ViewScope {
    cancel: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unmount(&self) {
        self.cancel.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Token a shell can keep to unmount the view from elsewhere.
    pub fn unmount_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("view unmounted, dropping in-flight result");
                None
            }
            out = fut => self.is_mounted().then_some(out),
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// What a view shows for a failed call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    /// Session ended by a 401. Never shown as a form banner.
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{}", .0.join(", "))]
    Conflict(Vec<String>),

    #[error("You cannot delete your own account")]
    SelfDelete,

    #[error("Could not reach the server: {0}")]
    Network(String),

    #[error("Server error {status}")]
    Server { status: u16, messages: Vec<String> },

    #[error("Unexpected response: {0}")]
    Local(String),
}

impl ViewError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ViewError::SessionExpired)
    }

    /// Backend-provided messages, if any.
    pub fn messages(&self) -> &[String] {
        match self {
            ViewError::Validation(m) | ViewError::Conflict(m) => m,
            ViewError::Server { messages, .. } => messages,
            _ => &[],
        }
    }

    /// Inline banner text. `None` for expired sessions.
    pub fn banner(&self) -> Option<String> {
        (!self.is_session_expired()).then(|| self.to_string())
    }

    /// Toast text: backend messages when present, `fallback` for generic
    /// failures, `None` for expired sessions.
    pub fn toast_message(&self, fallback: &str) -> Option<String> {
        match self {
            ViewError::SessionExpired => None,
            ViewError::NotFound(_) | ViewError::SelfDelete => Some(self.to_string()),
            _ if !self.messages().is_empty() => Some(self.messages().join(", ")),
            _ => Some(fallback.to_string()),
        }
    }
}

impl From<ApiError> for ViewError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => ViewError::SessionExpired,
            ApiError::Validation { body, .. } => ViewError::Validation(body.messages()),
            ApiError::NotFound(what) => ViewError::NotFound(what),
            ApiError::Conflict { body } => ViewError::Conflict(body.messages()),
            ApiError::Status { status, body } => ViewError::Server {
                status: status.as_u16(),
                messages: body.messages(),
            },
            ApiError::Transport(e) => ViewError::Network(e.to_string()),
            other => ViewError::Local(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of submitting a form.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Saved; the shell should navigate to the route.
    Saved(Route),
    /// Local validation failed; nothing was sent.
    Invalid,
    /// The backend or transport rejected the submission; the draft is kept.
    Failed(ViewError),
    /// The view was unmounted before the reply arrived.
    Cancelled,
}

/// Pending destructive action awaiting explicit confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation<T> {
    pending: Option<T>,
}

impl<T> Default for Confirmation<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Confirmation<T> {
    pub fn request(&mut self, target: T) {
        self.pending = Some(target);
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }
}
