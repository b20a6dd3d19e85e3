//! Response classification
//!
//! Maps a raw transport outcome to one of three kinds. `ReauthRequired`
//! never leaves the crate: the client resolves it into a success or
//! failure before delivery.

use dfcontacts_domain::{CallFailure, CallResult, HttpResponse, TransportError};
use serde_json::Value;

use super::session::SessionState;

/// Outcome of one HTTP exchange, before reauthentication is resolved
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Classification {
    Success(Option<Value>),
    Failure(CallFailure),
    /// 401 on a request that carried a token while credentials are cached.
    /// Holds the failure to deliver if recovery does not work out.
    ReauthRequired(CallFailure),
}

impl Classification {
    /// Collapse to a caller-visible result, treating an unresolved
    /// reauth signal as the failure it wraps
    pub(crate) fn into_call_result(self) -> CallResult {
        match self {
            Self::Success(body) => CallResult::success(body),
            Self::Failure(failure) | Self::ReauthRequired(failure) => CallResult::Failure(failure),
        }
    }
}

/// Classify one exchange
///
/// `sent_token` is the token the request carried. Only when it is present
/// and the session still caches both email and password does a 401 become
/// `ReauthRequired`; the token is then cleared (if it has not already been
/// replaced) while the credentials are kept for the retry.
pub(crate) fn classify(
    outcome: Result<HttpResponse, TransportError>,
    session: &SessionState,
    sent_token: Option<&str>,
) -> Classification {
    let response = match outcome {
        Ok(response) => response,
        Err(err) => return Classification::Failure(CallFailure::transport(err.to_string())),
    };

    let body = parse_body(&response.body);
    let status = response.status;

    if status == 401 {
        if let Some(token) = sent_token {
            if session.cached_credentials().is_some() {
                session.clear_token_if(token);
                return Classification::ReauthRequired(CallFailure::server(
                    status,
                    error_message(body.as_ref()),
                ));
            }
        }
    }

    if (200..300).contains(&status) {
        Classification::Success(body)
    } else {
        Classification::Failure(CallFailure::server(status, error_message(body.as_ref())))
    }
}

/// Parse a body as JSON; anything unparseable (or empty) becomes `None`
pub fn parse_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes).ok()
}

/// `error.message` from a DreamFactory error envelope, if present
pub fn error_message(body: Option<&Value>) -> Option<String> {
    body?
        .get("error")?
        .get("message")?
        .as_str()
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
