//! Logging setup
//!
//! Library code only emits `tracing` events; binaries and test harnesses
//! call [`init_tracing`] once to install a subscriber.

use std::str::FromStr;

use dfcontacts_domain::{DfError, Result};
use tracing_subscriber::EnvFilter;

/// Default directive when neither the caller nor `RUST_LOG` supplies one
pub const DEFAULT_FILTER: &str = "info";

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, single line per event
    #[default]
    Plain,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = DfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "text" | "pretty" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            other => Err(DfError::Config(format!("Unknown log format: {other}"))),
        }
    }
}

/// Build the filter: `RUST_LOG` wins, then `directives`, then [`DEFAULT_FILTER`]
///
/// # Errors
/// Returns `DfError::Config` if `directives` is not a valid filter.
pub fn env_filter(directives: Option<&str>) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(directives.unwrap_or(DEFAULT_FILTER))
        .map_err(|e| DfError::Config(format!("Invalid log filter: {e}")))
}

/// Install the global subscriber
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place and return `Ok(false)`.
///
/// # Errors
/// Returns `DfError::Config` if the filter directives are invalid.
pub fn init_tracing(directives: Option<&str>, format: LogFormat) -> Result<bool> {
    let filter = env_filter(directives)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match format {
        LogFormat::Plain => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };
    if installed {
        tracing::debug!(?format, "Tracing initialised");
    }
    Ok(installed)
}
