use fsclens_core::Failure;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Build a `Server` error from a non-2xx body.
    ///
    /// Error bodies look like `{"detail": "..."}`; the detail is used when
    /// present, otherwise the raw body, otherwise the status reason.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| match v.get("detail") {
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                Some(other) if !other.is_null() => Some(other.to_string()),
                _ => None,
            });
        let message = match detail {
            Some(detail) => detail,
            None if !body.trim().is_empty() => body.trim().to_string(),
            None => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        Self::Server {
            status: status.as_u16(),
            message,
        }
    }
}

impl From<ClientError> for Failure {
    fn from(err: ClientError) -> Self {
        Failure::network(err.to_string())
    }
}
