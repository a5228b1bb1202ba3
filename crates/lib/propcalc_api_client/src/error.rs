//! API error types.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use propcalc_core::session::SessionError;

/// Convenience alias for client and service return types.
pub type ApiResult<T> = Result<T, ApiError>;

/// Structured error body: `{"message": ".."}` or `{"errors": [..]}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<Value>,
}

impl ErrorBody {
    /// Parse a response body. Non-JSON text becomes the message.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<ErrorBody>(raw) {
            Ok(body) => body,
            Err(_) => Self {
                message: Some(raw.trim().to_string()),
                errors: Vec::new(),
            },
        }
    }

    /// Every message carried by the body, `errors` entries first.
    pub fn messages(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .errors
            .iter()
            .filter_map(|e| match e {
                Value::String(s) => Some(s.clone()),
                Value::Object(map) => map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect();
        if let Some(message) = self.message.as_ref().filter(|m| !m.is_empty()) {
            out.push(message.clone());
        }
        out
    }

    /// Messages joined for a single-line banner, if any.
    pub fn summary(&self) -> Option<String> {
        let messages = self.messages();
        (!messages.is_empty()).then(|| messages.join(", "))
    }
}

/// Errors returned by the HTTP client and the resource services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401. The session has already been cleared.
    #[error("Unauthorized")]
    Unauthorized,

    /// 400 or 422.
    #[error("Validation failed ({status})")]
    Validation { status: StatusCode, body: ErrorBody },

    /// 404, or a record missing from a list lookup.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 409.
    #[error("Conflict")]
    Conflict { body: ErrorBody },

    /// Login succeeded at the HTTP level but carried no token.
    #[error("Login response carried no token")]
    MissingToken,

    /// Any other non-success status.
    #[error("Request failed with status {status}")]
    Status { status: StatusCode, body: ErrorBody },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Map a non-success, non-401 status to an error.
    pub fn from_status(status: StatusCode, path: &str, body: ErrorBody) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::Validation { status, body }
            }
            StatusCode::NOT_FOUND => {
                ApiError::NotFound(body.summary().unwrap_or_else(|| path.to_string()))
            }
            StatusCode::CONFLICT => ApiError::Conflict { body },
            _ => ApiError::Status { status, body },
        }
    }

    /// HTTP status, when the error came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ApiError::Validation { status, .. } | ApiError::Status { status, .. } => Some(*status),
            ApiError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ApiError::Conflict { .. } => Some(StatusCode::CONFLICT),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Structured body sent by the backend, if any.
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            ApiError::Validation { body, .. }
            | ApiError::Conflict { body }
            | ApiError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Backend messages, empty for local failures.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ApiError::NotFound(m) => vec![m.clone()],
            _ => self.body().map(ErrorBody::messages).unwrap_or_default(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}
