//! Persisted console session: bearer token plus cached user identity.
//!
//! Both entries live in a [`SessionStorage`] under namespaced keys and are
//! always written or removed together.

pub mod storage;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageOp};

use crate::config::ConsoleConfig;
use crate::models::auth::UserSummary;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "admin";

/// Session storage errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Handle to the persisted session. Clones share the same storage.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    token_key: String,
    user_key: String,
}

impl SessionStore {
    /// Store over `storage` with keys `<namespace>_jwt_token` and
    /// `<namespace>_user`.
    pub fn new(storage: Arc<dyn SessionStorage>, namespace: &str) -> Self {
        Self {
            storage,
            token_key: format!("{namespace}_jwt_token"),
            user_key: format!("{namespace}_user"),
        }
    }

    /// Fresh, independent in-memory session.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), DEFAULT_NAMESPACE)
    }

    /// File-backed session at the configured location.
    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(
            Arc::new(FileStorage::new(config.session_file.clone())),
            &config.storage_namespace,
        )
    }

    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    pub fn user_key(&self) -> &str {
        &self.user_key
    }

    /// Persist a new session, replacing any previous one.
    pub fn save(&self, token: &str, user: &UserSummary) -> Result<(), SessionError> {
        let user_json = serde_json::to_string(user)?;
        self.storage.write(vec![
            StorageOp::Set(self.token_key.clone(), token.to_string()),
            StorageOp::Set(self.user_key.clone(), user_json),
        ])?;
        debug!(email = %user.email, "session saved");
        Ok(())
    }

    /// Remove token and user. Succeeds when nothing was stored.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.storage.write(vec![
            StorageOp::Remove(self.token_key.clone()),
            StorageOp::Remove(self.user_key.clone()),
        ])?;
        debug!("session cleared");
        Ok(())
    }

    /// Stored bearer token, if any. Unreadable storage counts as no token.
    pub fn token(&self) -> Option<String> {
        match self.storage.get(&self.token_key) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "failed to read session token");
                None
            }
        }
    }

    /// A token is present. Validity is the backend's decision.
    pub fn is_active(&self) -> bool {
        self.token().is_some()
    }

    /// Cached user, or `None` when missing, unreadable or malformed.
    pub fn current_user(&self) -> Option<UserSummary> {
        let raw = match self.storage.get(&self.user_key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "failed to read cached user");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "cached user is malformed");
                None
            }
        }
    }

    /// Replace the identity fields of the cached user after a profile
    /// update. Returns `false` when no user is cached.
    pub fn update_identity(
        &self,
        email: &str,
        full_name: Option<&str>,
    ) -> Result<bool, SessionError> {
        let Some(mut user) = self.current_user() else {
            return Ok(false);
        };
        user.email = email.to_string();
        user.full_name = full_name.map(str::to_string);
        let user_json = serde_json::to_string(&user)?;
        self.storage
            .write(vec![StorageOp::Set(self.user_key.clone(), user_json)])?;
        Ok(true)
    }
}
