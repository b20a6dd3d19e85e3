//! Client configuration
//!
//! One [`ClientConfig`] describes one DreamFactory instance. It is validated
//! once when a client is constructed, so request building never has to fail
//! later on a malformed base URL.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_REAUTH_CEILING, DEFAULT_TIMEOUT_SECS};
use crate::errors::{DfError, Result};

/// Connection settings for a DreamFactory instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every relative path is appended to
    /// (e.g. `https://example.dreamfactory.com/api/v2`)
    pub base_url: String,
    /// Static application API key sent on every request
    pub api_key: String,
    /// Per-request timeout
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
    /// Active-call count at or above which a silent reauth does not retry
    #[serde(default = "default_reauth_ceiling")]
    pub reauth_ceiling: usize,
    /// Optional `User-Agent` for the transport
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: default_timeout(),
            reauth_ceiling: default_reauth_ceiling(),
            user_agent: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_reauth_ceiling(mut self, ceiling: usize) -> Self {
        self.reauth_ceiling = ceiling;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Check that the configuration can produce well-formed requests
    ///
    /// # Errors
    ///
    /// Returns `DfError::Config` if the base URL does not parse as an
    /// absolute http(s) URL, if it carries a query or fragment, if the API
    /// key is empty, or if the timeout or reauth ceiling is zero.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| DfError::Config(format!("Invalid base URL {}: {}", self.base_url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DfError::Config(format!(
                "Unsupported base URL scheme: {}",
                parsed.scheme()
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(DfError::Config(
                "Base URL must not contain a query or fragment".to_string(),
            ));
        }
        if self.api_key.trim().is_empty() {
            return Err(DfError::Config("API key must not be empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(DfError::Config("Timeout must be greater than zero".to_string()));
        }
        if self.reauth_ceiling == 0 {
            return Err(DfError::Config("Reauth ceiling must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Base URL without a trailing slash, ready for path concatenation
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

const fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

const fn default_reauth_ceiling() -> usize {
    DEFAULT_REAUTH_CEILING
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ClientConfig {
        ClientConfig::new("https://df.example.com/api/v2", "key-123")
    }

    #[test]
    fn defaults_match_constants() {
        let config = valid();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.reauth_ceiling, 20);
        assert!(config.user_agent.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_malformed_base_url() {
        let config = ClientConfig::new("not a url", "key");
        assert!(matches!(config.validate(), Err(DfError::Config(_))));
    }

    #[test]
    fn rejects_base_url_with_query() {
        let config = ClientConfig::new("https://df.example.com/api?x=1", "key");
        assert!(matches!(config.validate(), Err(DfError::Config(_))));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let config = ClientConfig::new("ftp://df.example.com", "key");
        assert!(matches!(config.validate(), Err(DfError::Config(_))));
    }

    #[test]
    fn rejects_empty_api_key_and_zero_limits() {
        assert!(ClientConfig::new("https://df.example.com", "  ").validate().is_err());
        assert!(valid().with_timeout(Duration::ZERO).validate().is_err());
        assert!(valid().with_reauth_ceiling(0).validate().is_err());
    }

    #[test]
    fn trims_trailing_slash() {
        let config = ClientConfig::new("https://df.example.com/api/v2/", "key");
        assert_eq!(config.trimmed_base_url(), "https://df.example.com/api/v2");
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"base_url": "https://df.example.com", "api_key": "k", "timeout": 5}"#,
        )
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.reauth_ceiling, 20);
    }
}
