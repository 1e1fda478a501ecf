//! Client configuration
//!
//! Connection settings come from the environment, the desktop equivalent of
//! the web client's build-time API URL.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{AppError, AppResult};

/// Versioned base path every resource endpoint lives under.
pub const API_BASE_PATH: &str = "/api/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server origin, e.g. `https://chirp.example.com`
    pub server_url: Url,
    /// Where the access-token cookie is persisted; in-memory only if unset
    pub cookie_path: Option<PathBuf>,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl Config {
    /// Configuration pointing at `server_url` with defaults for the rest.
    pub fn new(server_url: &str) -> AppResult<Self> {
        let server_url = Url::parse(server_url)
            .map_err(|e| AppError::Config(format!("invalid server URL `{}`: {}", server_url, e)))?;
        Ok(Self {
            server_url,
            cookie_path: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Load configuration from `CHIRP_API_URL`, `CHIRP_COOKIE_FILE`, and
    /// `CHIRP_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> AppResult<Self> {
        let server_url = env::var("CHIRP_API_URL")
            .map_err(|_| AppError::Config("CHIRP_API_URL is not set".to_string()))?;
        let mut config = Self::new(&server_url)?;

        if let Ok(path) = env::var("CHIRP_COOKIE_FILE") {
            if !path.is_empty() {
                config.cookie_path = Some(PathBuf::from(path));
            }
        }

        if let Ok(secs) = env::var("CHIRP_HTTP_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!("Ignoring invalid CHIRP_HTTP_TIMEOUT_SECS: {}", secs),
            }
        }

        Ok(config)
    }

    /// Persist the access-token cookie at `path`.
    pub fn with_cookie_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_path = Some(path.into());
        self
    }

    /// Fully qualified, versioned API base, e.g. `https://host/api/v1`.
    pub fn api_base(&self) -> String {
        let origin = self.server_url.as_str().trim_end_matches('/');
        format!("{}{}", origin, API_BASE_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_appends_versioned_path() {
        let config = Config::new("https://chirp.example.com").unwrap();
        assert_eq!(config.api_base(), "https://chirp.example.com/api/v1");

        // Trailing slash on the origin must not double up.
        let config = Config::new("https://chirp.example.com/").unwrap();
        assert_eq!(config.api_base(), "https://chirp.example.com/api/v1");
    }

    #[test]
    fn test_invalid_server_url_is_rejected() {
        let err = Config::new("not a url").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
