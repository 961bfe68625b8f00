//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOP_API_BASE_URL` - Base URL of the shop REST API
//!
//! ## Optional
//! - `SHOP_API_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! - `SHOP_SESSION_FILE` - Path for the durable session file
//!   (default: platform data dir, e.g. `~/.local/share/sole-trader/session.json`)

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Could not determine a platform data directory for the session file")]
    NoDataDir,
}

/// Shop client configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Base URL of the shop REST API.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Path of the durable session file.
    pub session_file: PathBuf,
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let raw = require_env("SHOP_API_BASE_URL")?;
        let base_url = parse_base_url("SHOP_API_BASE_URL", &raw)?;

        let timeout_secs = match optional_env("SHOP_API_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("SHOP_API_TIMEOUT_SECS".into(), e.to_string())
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let session_file = match optional_env("SHOP_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_file()?,
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            session_file,
        })
    }

    /// Build a config for a given base URL with defaults elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL is invalid or no data directory can
    /// be resolved.
    pub fn for_base_url(base_url: &str, session_file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let base_url = parse_base_url("base_url", base_url)?;
        let session_file = match session_file {
            Some(path) => path,
            None => default_session_file()?,
        };
        Ok(Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file,
        })
    }
}

fn parse_base_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            name.to_owned(),
            format!("unsupported scheme: {}", url.scheme()),
        ));
    }
    Ok(url)
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn default_session_file() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "sole-trader", "sole-trader")
        .ok_or(ConfigError::NoDataDir)?;
    Ok(dirs.data_dir().join("session.json"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_for_base_url() {
        let config =
            ShopConfig::for_base_url("https://shop.example.com/api", Some("/tmp/s.json".into()))
                .unwrap();
        assert_eq!(config.base_url.as_str(), "https://shop.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn test_rejects_bad_url() {
        assert!(matches!(
            ShopConfig::for_base_url("not a url", Some("/tmp/s.json".into())),
            Err(ConfigError::InvalidEnvVar(..))
        ));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        assert!(matches!(
            ShopConfig::for_base_url("ftp://shop.example.com", Some("/tmp/s.json".into())),
            Err(ConfigError::InvalidEnvVar(..))
        ));
    }
}
