//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value}")]
    InvalidUrl { var: &'static str, value: String },
}

/// API operations the gateway knows how to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Register,
    Logout,
    GetBalance,
}

impl Endpoint {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/api/login",
            Self::Register => "/api/register",
            Self::Logout => "/api/logout",
            Self::GetBalance => "/api/getBalance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin the client is served from. Relative API paths resolve against it.
    pub origin: String,
    /// Externally supplied API base used for registration.
    pub api_url: Option<String>,
    pub timeouts: Timeouts,
    /// Directory holding the origin-scoped identity files.
    pub store_dir: PathBuf,
}

impl ClientConfig {
    /// Config for `origin` with every other value at its default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] when `origin` is not an http(s) URL.
    pub fn new(origin: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            origin: normalize_base("KODBANK_ORIGIN", origin)?,
            api_url: None,
            timeouts: Timeouts::default(),
            store_dir: default_store_dir(),
        })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `KODBANK_ORIGIN`: default `http://127.0.0.1:5000`
    /// - `KODBANK_API_URL`: registration base URL, origin when absent
    /// - `KODBANK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `KODBANK_CONNECT_TIMEOUT_SECS`: default 10
    /// - `KODBANK_STORE_DIR`: default `<tmp>/kodbank`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] for a malformed origin or API URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let origin = std::env::var("KODBANK_ORIGIN").unwrap_or_else(|_| DEFAULT_ORIGIN.to_owned());
        let api_url = std::env::var("KODBANK_API_URL").ok().filter(|v| !v.trim().is_empty());
        let store_dir = std::env::var("KODBANK_STORE_DIR").map_or_else(|_| default_store_dir(), PathBuf::from);
        let timeouts = Timeouts {
            request_secs: env_parse_u64("KODBANK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("KODBANK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        let mut config = Self::new(&origin)?.with_store_dir(store_dir);
        config.timeouts = timeouts;
        if let Some(api_url) = api_url {
            config = config.with_api_url(&api_url)?;
        }
        Ok(config)
    }

    /// Replace the origin, keeping every other value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] when `origin` is not an http(s) URL.
    pub fn with_origin(mut self, origin: &str) -> Result<Self, ConfigError> {
        self.origin = normalize_base("KODBANK_ORIGIN", origin)?;
        Ok(self)
    }

    /// Route registration through `api_url` instead of the origin.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] when `api_url` is not an http(s) URL.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = Some(normalize_base("KODBANK_API_URL", api_url)?);
        Ok(self)
    }

    #[must_use]
    pub fn with_store_dir(mut self, store_dir: PathBuf) -> Self {
        self.store_dir = store_dir;
        self
    }

    /// Absolute URL for `endpoint`.
    ///
    /// Registration honors `api_url`; every other call goes to the origin.
    #[must_use]
    pub fn endpoint(&self, endpoint: Endpoint) -> String {
        let base = match (endpoint, &self.api_url) {
            (Endpoint::Register, Some(api_url)) => api_url,
            _ => &self.origin,
        };
        format!("{base}{}", endpoint.path())
    }
}

fn normalize_base(var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = || ConfigError::InvalidUrl { var, value: raw.to_owned() };
    let url = reqwest::Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(trimmed.to_owned())
}

fn default_store_dir() -> PathBuf {
    std::env::temp_dir().join("kodbank")
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
