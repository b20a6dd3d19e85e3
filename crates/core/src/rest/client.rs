//! REST client with silent reauthentication
//!
//! Issues logical calls against one DreamFactory instance, recovers from
//! session expiry by signing in again with the cached credentials, and runs
//! ordered call chains where each step gates the next.
//!
//! # Reauthentication bound
//!
//! There is no per-call retry counter. An attempt keeps its activity guard
//! until its outcome, including any retry it triggered, is known, so nested
//! retries stack on the shared activity count. A retry is only issued while
//! that count is below [`ClientConfig::reauth_ceiling`].

use std::sync::Arc;

use dfcontacts_domain::constants::{
    MISSING_SESSION_TOKEN_MESSAGE, PATH_USER_REGISTER, PATH_USER_SESSION,
};
use dfcontacts_domain::{CallFailure, CallResult, ClientConfig, LogicalCall, Result};
use futures::future::BoxFuture;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use super::activity::ActivityCounter;
use super::classifier::{classify, Classification};
use super::ports::HttpTransport;
use super::request::build_request;
use super::session::{Renewal, SessionState};

/// Whether a 401 on this call may trigger a silent sign-in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reauth {
    Allowed,
    /// Auth endpoints themselves never recurse into a sign-in
    Never,
}

/// Session-aware REST client
///
/// One instance holds one session and one activity counter. Share it with
/// `Arc<RestClient>`; all methods take `&self`.
pub struct RestClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    session: SessionState,
    activity: ActivityCounter,
}

impl RestClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns `DfError::Config` if the configuration is invalid (see
    /// [`ClientConfig::validate`]).
    pub fn new(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport, session: SessionState::new(), activity: ActivityCounter::new() })
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub const fn session(&self) -> &SessionState {
        &self.session
    }

    pub const fn activity(&self) -> &ActivityCounter {
        &self.activity
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_signed_in()
    }

    /// Forget the session; no silent reauth is possible until the next sign-in
    pub fn sign_out(&self) {
        self.session.sign_out();
        info!("Signed out");
    }

    /// Issue one logical call
    ///
    /// A 401 against a live session is recovered transparently (see module
    /// docs); every other outcome is delivered as-is.
    #[instrument(skip(self, call), fields(method = %call.method(), path = %call.relative_path()))]
    pub async fn call(&self, call: &LogicalCall) -> CallResult {
        self.execute(call, Reauth::Allowed).await
    }

    /// Issue calls strictly in order, stopping at the first failure
    ///
    /// Step `n + 1` starts only after step `n` (including any reauth retry)
    /// succeeded. The result is the first failure, or the last step's
    /// success. An empty chain succeeds with no body.
    #[instrument(skip(self, calls), fields(steps = calls.len()))]
    pub async fn call_chain(&self, calls: &[LogicalCall]) -> CallResult {
        let mut last = CallResult::success(None);
        for (step, call) in calls.iter().enumerate() {
            last = self.execute(call, Reauth::Allowed).await;
            if let CallResult::Failure(failure) = &last {
                warn!(step, path = %call.relative_path(), error = %failure, "Call chain aborted");
                return last;
            }
        }
        debug!("Call chain completed");
        last
    }

    /// Sign in and cache the credentials for silent reauthentication
    ///
    /// # Errors
    ///
    /// Returns the call failure, or a [`FailureKind::Auth`] failure when a
    /// 2xx response carries no session token.
    ///
    /// [`FailureKind::Auth`]: dfcontacts_domain::FailureKind::Auth
    #[instrument(skip(self, password))]
    pub async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<(), CallFailure> {
        let call = credentials_call(PATH_USER_SESSION, email, password);
        let body = self.execute(&call, Reauth::Never).await.into_result()?;

        if self.session.apply_sign_in_result(body.as_ref(), email, password) {
            info!("Signed in");
            Ok(())
        } else {
            warn!("Sign-in response carried no session token");
            Err(CallFailure::auth(MISSING_SESSION_TOKEN_MESSAGE))
        }
    }

    /// Register a new user, then sign in with the same credentials
    ///
    /// # Errors
    ///
    /// Returns the registration failure without attempting to sign in, or
    /// the sign-in failure.
    #[instrument(skip(self, password))]
    pub async fn register_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<(), CallFailure> {
        let call = credentials_call(PATH_USER_REGISTER, email, password);
        if let CallResult::Failure(failure) = self.execute(&call, Reauth::Never).await {
            warn!(error = %failure, "Registration failed");
            return Err(failure);
        }
        info!("Registered; signing in");
        self.sign_in_with_email(email, password).await
    }

    fn execute<'a>(&'a self, call: &'a LogicalCall, reauth: Reauth) -> BoxFuture<'a, CallResult> {
        Box::pin(async move {
            let _attempt = self.activity.enter();

            let token = self.session.token();
            let request = build_request(&self.config, call, token.as_deref());
            debug!(method = %request.method, url = %request.url, "Sending request");

            let outcome = self.transport.send(request).await;
            match &outcome {
                Ok(response) => debug!(status = response.status, "Received response"),
                Err(err) => warn!(error = %err, "Transport failure"),
            }

            let sent_token = match reauth {
                Reauth::Allowed => token.as_deref(),
                Reauth::Never => None,
            };
            match classify(outcome, &self.session, sent_token) {
                Classification::ReauthRequired(failure) => {
                    self.reauthenticate_and_retry(call, failure).await
                }
                other => other.into_call_result(),
            }
        })
    }

    async fn reauthenticate_and_retry(&self, call: &LogicalCall, failure: CallFailure) -> CallResult {
        let Some(credentials) = self.session.cached_credentials() else {
            return CallResult::Failure(failure);
        };

        info!("Session expired; signing in again");
        let sign_in = credentials_call(PATH_USER_SESSION, &credentials.email, &credentials.password);
        let body = match self.execute(&sign_in, Reauth::Never).await.into_result() {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "Silent sign-in failed; clearing session");
                self.session.sign_out_if_current(credentials.epoch);
                return CallResult::Failure(failure);
            }
        };

        match self.session.apply_renewal(body.as_ref(), &credentials) {
            Renewal::Applied => {}
            Renewal::MissingToken => {
                warn!("Silent sign-in response carried no session token; session cleared");
                return CallResult::Failure(failure);
            }
            Renewal::Superseded => {
                info!("Session changed during silent sign-in; not retrying");
                return CallResult::Failure(failure);
            }
        }

        let active = self.activity.current();
        if active >= self.config.reauth_ceiling {
            warn!(active, ceiling = self.config.reauth_ceiling, "Reauth ceiling reached; not retrying");
            return CallResult::Failure(failure);
        }

        debug!(active, "Retrying after reauthentication");
        self.execute(call, Reauth::Allowed).await
    }
}

fn credentials_call(path: &str, email: &str, password: &str) -> LogicalCall {
    LogicalCall::post(path).with_body(json!({ "email": email, "password": password }))
}
