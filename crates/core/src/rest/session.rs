//! Session state
//!
//! Single source of truth for "are we authenticated" plus the minimum data
//! needed to sign in again silently after the token expires.
//!
//! The password is held in memory, in plain text, for the lifetime of the
//! session. That is what makes transparent reauthentication possible; it is
//! also the weakest point of the design. It is never logged and never
//! leaves this module except to build the reauthentication request.

use std::fmt;

use dfcontacts_domain::constants::{FIELD_EMAIL, FIELD_SESSION_TOKEN};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

#[derive(Default)]
struct SessionData {
    token: Option<String>,
    email: Option<String>,
    password: Option<String>,
    /// Bumped by every explicit sign-in or sign-out
    epoch: u64,
}

impl SessionData {
    fn reset(&mut self) {
        *self = Self { epoch: self.epoch + 1, ..Self::default() };
    }
}

/// Email and password cached by the last successful sign-in
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Credentials {
    pub email: String,
    pub password: String,
    /// Session epoch the credentials were read under
    pub epoch: u64,
}

/// Outcome of applying a silent sign-in response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Renewal {
    Applied,
    /// No token in the response; the session was cleared
    MissingToken,
    /// The session was signed out or signed in again meanwhile; nothing written
    Superseded,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("epoch", &self.epoch)
            .finish()
    }
}

/// Read-only view of the session, safe to log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub signed_in: bool,
    pub email: Option<String>,
    pub has_cached_password: bool,
}

/// Authentication state shared by every call issued through one client
#[derive(Default)]
pub struct SessionState {
    inner: RwLock<SessionData>,
}

impl SessionState {
    /// An empty, signed-out session
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` iff a session token is present
    pub fn is_signed_in(&self) -> bool {
        self.inner.read().token.is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    pub fn email(&self) -> Option<String> {
        self.inner.read().email.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let data = self.inner.read();
        SessionSnapshot {
            signed_in: data.token.is_some(),
            email: data.email.clone(),
            has_cached_password: data.password.is_some(),
        }
    }

    pub(crate) fn cached_credentials(&self) -> Option<Credentials> {
        let data = self.inner.read();
        match (&data.email, &data.password) {
            (Some(email), Some(password)) => {
                Some(Credentials { email: email.clone(), password: password.clone(), epoch: data.epoch })
            }
            _ => None,
        }
    }

    /// Populate the session from a sign-in or register response body
    ///
    /// The token comes from `session_token`; the account email from `email`,
    /// falling back to the email the caller signed in with. Without a token
    /// the session is reset to signed-out. Returns whether a token was found.
    ///
    /// Any silent sign-in still in flight is superseded.
    pub fn apply_sign_in_result(&self, body: Option<&Value>, email: &str, password: &str) -> bool {
        let mut data = self.inner.write();
        data.epoch += 1;
        install(&mut data, body, email, password)
    }

    /// Apply a silent sign-in response made with `credentials`
    ///
    /// Writes nothing if the session epoch moved since the credentials were
    /// read, so an explicit sign-out cannot be undone by a late response.
    pub(crate) fn apply_renewal(&self, body: Option<&Value>, credentials: &Credentials) -> Renewal {
        let mut data = self.inner.write();
        if data.epoch != credentials.epoch {
            return Renewal::Superseded;
        }
        if install(&mut data, body, &credentials.email, &credentials.password) {
            Renewal::Applied
        } else {
            Renewal::MissingToken
        }
    }

    /// Forget token, email and cached password. Idempotent.
    pub fn sign_out(&self) {
        self.inner.write().reset();
        debug!("Session cleared");
    }

    /// [`sign_out`](Self::sign_out), unless the session epoch moved past `epoch`
    pub(crate) fn sign_out_if_current(&self, epoch: u64) -> bool {
        let mut data = self.inner.write();
        if data.epoch != epoch {
            return false;
        }
        data.reset();
        debug!("Session cleared");
        true
    }

    /// Drop the token but keep the credentials needed to sign in again
    pub fn clear_token_only(&self) {
        self.clear_token_where(|_| true);
    }

    /// [`clear_token_only`](Self::clear_token_only), but only if the token is still `expected`
    ///
    /// A concurrent reauthentication may already have installed a fresh
    /// token; that one must survive a stale 401.
    pub(crate) fn clear_token_if(&self, expected: &str) -> bool {
        self.clear_token_where(|token| token == expected)
    }

    fn clear_token_where(&self, matches: impl FnOnce(&str) -> bool) -> bool {
        let mut data = self.inner.write();
        match data.token.as_deref() {
            Some(token) if matches(token) => {
                data.token = None;
                true
            }
            _ => false,
        }
    }
}

fn install(data: &mut SessionData, body: Option<&Value>, email: &str, password: &str) -> bool {
    let token = body
        .and_then(|b| b.get(FIELD_SESSION_TOKEN))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let Some(token) = token else {
        data.reset();
        return false;
    };
    let account_email = body
        .and_then(|b| b.get(FIELD_EMAIL))
        .and_then(Value::as_str)
        .unwrap_or(email)
        .to_string();
    data.token = Some(token);
    data.email = Some(account_email);
    data.password = Some(password.to_string());
    true
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState").field("snapshot", &self.snapshot()).finish()
    }
}
