//! Request lifecycle state machine.
//!
//! One [`RequestLifecycle`] tracks one logical operation ("the current
//! search", "the current dashboard load"). Every start issues a new
//! [`RequestToken`]; a completion carrying any other token is discarded, so
//! an older response that arrives late can never overwrite a newer one.
//!
//! ```text
//! Idle ── begin ──▶ Loading ── complete(Ok) ──▶ Success
//!   ▲                  │  ▲                        │
//!   │                  │  └──────── begin ─────────┤
//!   │                  └── complete(Err) ──▶ Failed┘
//!   └──────────────────────── reset ───────────────┘
//! ```

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::query::QueryError;

/// Identifies one issued operation. Tokens increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input rejected before anything was sent.
    Validation,
    /// Transport failure, non-2xx response, or unreadable body.
    Network,
}

/// Why an operation ended in [`RequestState::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl Failure {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Network,
            message: message.into(),
        }
    }
}

impl From<QueryError> for Failure {
    fn from(err: QueryError) -> Self {
        Self::validation(err.to_string())
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "payload", rename_all = "snake_case")]
pub enum RequestState<T> {
    Idle,
    Loading,
    Success(T),
    Failed(Failure),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Success(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Owns the state and the token counter for one logical operation.
///
/// Never panics and never returns errors: callers read [`state`](Self::state).
#[derive(Debug, Clone)]
pub struct RequestLifecycle<T> {
    state: RequestState<T>,
    issued: u64,
}

impl<T> Default for RequestLifecycle<T> {
    fn default() -> Self {
        Self {
            state: RequestState::Idle,
            issued: 0,
        }
    }
}

impl<T> RequestLifecycle<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    /// The most recently issued token, if any.
    pub fn current_token(&self) -> Option<RequestToken> {
        (self.issued > 0).then_some(RequestToken(self.issued))
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.issued
    }

    /// Start a new operation. Drops any displayed payload and supersedes
    /// whatever was in flight.
    pub fn begin(&mut self) -> RequestToken {
        self.issued += 1;
        self.state = RequestState::Loading;
        RequestToken(self.issued)
    }

    /// Start and immediately fail an operation, e.g. on invalid input.
    pub fn reject(&mut self, failure: Failure) -> RequestToken {
        let token = self.begin();
        self.state = RequestState::Failed(failure);
        token
    }

    /// Apply a completion. Returns `false` (and changes nothing) when the
    /// token has been superseded.
    pub fn complete(&mut self, token: RequestToken, outcome: Result<T, Failure>) -> bool {
        if !self.is_current(token) {
            debug!(%token, current = self.issued, "discarding stale response");
            return false;
        }
        if !self.state.is_loading() {
            debug!(%token, "operation already settled");
            return false;
        }
        self.state = match outcome {
            Ok(payload) => RequestState::Success(payload),
            Err(failure) => RequestState::Failed(failure),
        };
        true
    }

    /// Return to `Idle`. Anything still in flight becomes stale.
    pub fn reset(&mut self) {
        self.issued += 1;
        self.state = RequestState::Idle;
    }
}
