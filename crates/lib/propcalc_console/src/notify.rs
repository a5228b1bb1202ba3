//! Transient toast notifications.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

/// How long a shell should keep a toast on screen.
pub const AUTO_HIDE: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub severity: Severity,
    pub message: String,
}

/// Shared toast queue. Views push, the shell drains.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    queue: Arc<Mutex<VecDeque<Toast>>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Severity::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Severity::Error, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(Severity::Info, message.into());
    }

    fn push(&self, severity: Severity, message: String) {
        debug!(?severity, %message, "toast");
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Toast { severity, message });
    }

    /// Take every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    /// Most recent toast without removing it.
    pub fn last(&self) -> Option<Toast> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}
