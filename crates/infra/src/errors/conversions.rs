//! Conversions from external infrastructure errors into domain errors.

use std::time::Duration;

use dfcontacts_domain::{DfError, TransportError};
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DfError);

impl From<InfraError> for DfError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DfError> for InfraError {
    fn from(value: DfError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DfError (client construction) */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        if value.is_builder() {
            return InfraError(DfError::Config(format!("invalid HTTP client settings: {value}")));
        }
        InfraError(DfError::Network(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportError (per exchange) */
/* -------------------------------------------------------------------------- */

/// Map a failed exchange to the transport error the core classifies
///
/// `timeout` is the per-request timeout that was in force, reported back in
/// [`TransportError::Timeout`].
pub fn into_transport_error(err: HttpError, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout(timeout);
    }

    #[cfg(not(target_arch = "wasm32"))]
    if err.is_connect() {
        return TransportError::Connect(describe(&err));
    }

    TransportError::Request(describe(&err))
}

/// Error text including its source chain; reqwest's own Display omits the cause
fn describe(err: &HttpError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
