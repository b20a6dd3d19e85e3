//! Configuration loader
//!
//! Loads [`ClientConfig`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Whatever the source, the result is validated before it is returned.
//!
//! ## Environment Variables
//! - `DFCONTACTS_BASE_URL`: DreamFactory API base URL (required)
//! - `DFCONTACTS_API_KEY`: Application API key (required)
//! - `DFCONTACTS_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `DFCONTACTS_REAUTH_CEILING`: Active-call ceiling for silent reauth
//! - `DFCONTACTS_USER_AGENT`: `User-Agent` header value
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./dfcontacts.json` or `./dfcontacts.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::time::Duration;

use dfcontacts_domain::{ClientConfig, DfError, Result};

pub const ENV_BASE_URL: &str = "DFCONTACTS_BASE_URL";
pub const ENV_API_KEY: &str = "DFCONTACTS_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "DFCONTACTS_TIMEOUT_SECS";
pub const ENV_REAUTH_CEILING: &str = "DFCONTACTS_REAUTH_CEILING";
pub const ENV_USER_AGENT: &str = "DFCONTACTS_USER_AGENT";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `DfError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `DfError::Config` if a required variable is missing, an optional
/// numeric variable does not parse, or validation fails.
pub fn load_from_env() -> Result<ClientConfig> {
    let base_url = env_var(ENV_BASE_URL)?;
    let api_key = env_var(ENV_API_KEY)?;
    let mut config = ClientConfig::new(base_url, api_key);

    if let Some(secs) = env_number::<u64>(ENV_TIMEOUT_SECS)? {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(ceiling) = env_number::<usize>(ENV_REAUTH_CEILING)? {
        config = config.with_reauth_ceiling(ceiling);
    }
    if let Ok(agent) = std::env::var(ENV_USER_AGENT) {
        config = config.with_user_agent(agent);
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `DfError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid or validation fails
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DfError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DfError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DfError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DfError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DfError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(DfError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("dfcontacts.json"),
        dir.join("dfcontacts.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| DfError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional numeric environment variable
fn env_number<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| DfError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 5] =
        [ENV_BASE_URL, ENV_API_KEY, ENV_TIMEOUT_SECS, ENV_REAUTH_CEILING, ENV_USER_AGENT];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_BASE_URL, "https://df.example.com/api/v2");
        std::env::set_var(ENV_API_KEY, "env-key");
        std::env::set_var(ENV_TIMEOUT_SECS, "15");
        std::env::set_var(ENV_REAUTH_CEILING, "5");
        std::env::set_var(ENV_USER_AGENT, "contacts/1.0");

        let result = load_from_env();
        assert!(result.is_ok(), "Should load config from env vars, error: {:?}", result.err());

        let config = result.unwrap();
        assert_eq!(config.base_url, "https://df.example.com/api/v2");
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.reauth_ceiling, 5);
        assert_eq!(config.user_agent.as_deref(), Some("contacts/1.0"));

        clear_env();
    }

    #[test]
    fn test_load_from_env_defaults_optional_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_BASE_URL, "https://df.example.com/api/v2");
        std::env::set_var(ENV_API_KEY, "env-key");

        let config = load_from_env().unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.reauth_ceiling, 20);
        assert!(config.user_agent.is_none());

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_BASE_URL, "https://df.example.com/api/v2");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, DfError::Config(ref msg) if msg.contains(ENV_API_KEY)));

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_BASE_URL, "https://df.example.com/api/v2");
        std::env::set_var(ENV_API_KEY, "env-key");
        std::env::set_var(ENV_TIMEOUT_SECS, "soon");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, DfError::Config(_)), "Should be a Config error");

        clear_env();
    }

    #[test]
    fn test_load_from_env_rejects_invalid_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_BASE_URL, "ftp://df.example.com");
        std::env::set_var(ENV_API_KEY, "env-key");

        assert!(matches!(load_from_env(), Err(DfError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let path = temp_config(
            r#"{
                "base_url": "https://df.example.com/api/v2",
                "api_key": "file-key",
                "timeout": 10
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.api_key, "file-key");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.reauth_ceiling, 20);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let path = temp_config(
            r#"
base_url = "https://df.example.com/api/v2/"
api_key = "file-key"
reauth_ceiling = 8
user_agent = "contacts-cli"
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.reauth_ceiling, 8);
        assert_eq!(config.user_agent.as_deref(), Some("contacts-cli"));
        assert_eq!(config.trimmed_base_url(), "https://df.example.com/api/v2");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_validates() {
        let path = temp_config(r#"{"base_url": "https://df.example.com", "api_key": ""}"#, "json");

        let err = load_from_file(Some(path.clone())).unwrap_err();
        assert!(matches!(err, DfError::Config(_)));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(matches!(result, Err(DfError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_parse_config_invalid_json() {
        let result = parse_config(r#"{ "this is": "not valid json" "#, Path::new("test.json"));
        assert!(matches!(result, Err(DfError::Config(ref msg)) if msg.contains("JSON")));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_candidates_cover_both_names_and_parents() {
        let candidates = candidates_in(Path::new("/srv/app"));
        assert_eq!(candidates[0], PathBuf::from("/srv/app/config.json"));
        assert!(candidates.contains(&PathBuf::from("/srv/app/dfcontacts.toml")));
        assert!(candidates.contains(&PathBuf::from("/srv/app/../../config.toml")));
    }
}
