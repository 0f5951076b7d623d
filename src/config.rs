//! Application configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_STATE_DIR: &str = ".adminpanel";
pub const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Parse { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub state_dir: PathBuf,
    /// `None` waits for the identity check indefinitely.
    pub identity_timeout: Option<Duration>,
    pub http: HttpTimeouts,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            identity_timeout: Some(Duration::from_secs(DEFAULT_IDENTITY_TIMEOUT_SECS)),
            http: HttpTimeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
        }
    }
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `ADMINPANEL_API_BASE_URL`: default `http://127.0.0.1:8000/api`
    /// - `ADMINPANEL_STATE_DIR`: default `.adminpanel`
    /// - `ADMINPANEL_IDENTITY_TIMEOUT_SECS`: default 10, `0` disables
    /// - `ADMINPANEL_REQUEST_TIMEOUT_SECS`: default 30
    /// - `ADMINPANEL_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if a numeric variable is not a `u64`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("ADMINPANEL_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let state_dir = std::env::var("ADMINPANEL_STATE_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_STATE_DIR), PathBuf::from);
        let identity_secs = env_parse_u64("ADMINPANEL_IDENTITY_TIMEOUT_SECS", DEFAULT_IDENTITY_TIMEOUT_SECS)?;
        let http = HttpTimeouts {
            request_secs: env_parse_u64("ADMINPANEL_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_u64("ADMINPANEL_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self {
            api_base_url,
            state_dir,
            identity_timeout: identity_timeout(identity_secs),
            http,
        })
    }
}

fn identity_timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn env_parse_u64(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Parse { var, value: raw }),
        Err(_) => Ok(default),
    }
}
