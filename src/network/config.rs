//! API configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::Credentials;

pub const BASE_URL_ENV: &str = "MATE_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "MATE_API_TIMEOUT_SECS";
pub const TOKEN_ENV: &str = "MATE_API_TOKEN";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Where and how the API is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub credentials: Option<Credentials>,
}

fn default_base_url() -> String {
    "http://localhost:8080/api/v1/".to_string()
}

fn default_user_agent() -> String {
    format!("mate_stores/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            credentials: None,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Load from a JSON file. Absent fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ApiConfig = serde_json::from_str(&content)?;
        config.base()?;
        Ok(config)
    }

    /// Defaults overridden by `MATE_API_BASE_URL`, `MATE_API_TIMEOUT_SECS`
    /// and `MATE_API_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup(BASE_URL_ENV) {
            self.base_url = url;
        }
        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            self.timeout_secs = timeout.parse().map_err(|_| ConfigError::InvalidEnv {
                name: TIMEOUT_ENV,
                value: timeout.clone(),
            })?;
        }
        if let Some(token) = lookup(TOKEN_ENV) {
            self.credentials = Some(Credentials::Bearer { token });
        }
        self.base()?;
        Ok(())
    }

    /// Parsed base URL. Always ends with `/` so relative paths join beneath it.
    pub fn base(&self) -> Result<Url, ConfigError> {
        let mut raw = self.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Absolute URL for a request path.
    pub fn url_for(&self, path: &str) -> Result<Url, ConfigError> {
        self.base()?
            .join(path.trim_start_matches('/'))
            .map_err(|e| ConfigError::InvalidBaseUrl {
                url: format!("{}{}", self.base_url, path),
                reason: e.to_string(),
            })
    }
}
