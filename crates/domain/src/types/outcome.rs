//! Outcomes of logical calls
//!
//! Callers only ever see [`CallResult::Success`] or [`CallResult::Failure`].
//! The "reauthentication required" signal lives in the core classifier and
//! is resolved before a result leaves the client.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::constants::GENERIC_FAILURE_MESSAGE;

/// Why a call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// No response reached us (connectivity, timeout)
    Transport,
    /// The server answered with a non-2xx status
    Server,
    /// A sign-in exchange succeeded at HTTP level but yielded no session
    Auth,
}

crate::impl_wire_name_conversions!(FailureKind {
    Transport => "transport",
    Server => "server",
    Auth => "auth",
});

/// Failure details delivered to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFailure {
    pub kind: FailureKind,
    pub status_code: Option<u16>,
    pub message: Option<String>,
}

impl CallFailure {
    pub fn transport(message: impl Into<String>) -> Self {
        Self { kind: FailureKind::Transport, status_code: None, message: Some(message.into()) }
    }

    pub const fn server(status_code: u16, message: Option<String>) -> Self {
        Self { kind: FailureKind::Server, status_code: Some(status_code), message }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self { kind: FailureKind::Auth, status_code: None, message: Some(message.into()) }
    }

    /// Text suitable for showing to a user
    pub fn user_message(&self) -> &str {
        self.message.as_deref().filter(|m| !m.is_empty()).unwrap_or(GENERIC_FAILURE_MESSAGE)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code == Some(401)
    }
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "{} failure (HTTP {}): {}", self.kind, status, self.user_message()),
            None => write!(f, "{} failure: {}", self.kind, self.user_message()),
        }
    }
}

impl std::error::Error for CallFailure {}

/// Result of a logical call or call chain
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    /// 2xx response; `body` is absent when the payload was not JSON
    Success { body: Option<Value> },
    Failure(CallFailure),
}

impl CallResult {
    pub const fn success(body: Option<Value>) -> Self {
        Self::Success { body }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub const fn body(&self) -> Option<&Value> {
        match self {
            Self::Success { body } => body.as_ref(),
            Self::Failure(_) => None,
        }
    }

    pub const fn failure(&self) -> Option<&CallFailure> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Convert into a `Result` so callers can use `?`
    ///
    /// # Errors
    ///
    /// Returns the contained [`CallFailure`] for a failed call.
    pub fn into_result(self) -> Result<Option<Value>, CallFailure> {
        match self {
            Self::Success { body } => Ok(body),
            Self::Failure(failure) => Err(failure),
        }
    }
}

impl From<CallFailure> for CallResult {
    fn from(failure: CallFailure) -> Self {
        Self::Failure(failure)
    }
}
