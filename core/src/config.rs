//! Client configuration.
//!
//! A `ClientConfig` is an explicit value handed to `AnytypeClient::new` (or
//! a facade constructor). Nothing is read from process-wide state after
//! construction.

use std::env;
use std::time::Duration;

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:31009";
pub const DEFAULT_API_VERSION: &str = "2025-11-08";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_KEY: &str = "ANYTYPE_API_KEY";
pub const ENV_BASE_URL: &str = "ANYTYPE_BASE_URL";
pub const ENV_API_VERSION: &str = "ANYTYPE_API_VERSION";
pub const ENV_TIMEOUT_SECS: &str = "ANYTYPE_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_version: String,
    /// Applied to every request as a global deadline.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::default().with_api_key(api_key)
    }

    /// Build a config from `ANYTYPE_*` environment variables, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(key) = env::var(ENV_API_KEY) {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        if let Ok(url) = env::var(ENV_BASE_URL) {
            config = config.with_base_url(&url);
        }
        if let Ok(version) = env::var(ENV_API_VERSION) {
            config.api_version = version;
        }
        if let Ok(secs) = env::var(ENV_TIMEOUT_SECS) {
            let secs: f64 = secs
                .parse()
                .map_err(|_| ApiError::Config(format!("{ENV_TIMEOUT_SECS} is not a number: {secs}")))?;
            config.timeout = Duration::try_from_secs_f64(secs)
                .map_err(|e| ApiError::Config(format!("{ENV_TIMEOUT_SECS}: {e}")))?;
        }
        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_app() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:31009");
        assert_eq!(config.api_version, "2025-11-08");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.api_key.is_none());
    }

    // The only test that touches the process environment.
    #[test]
    fn from_env_reads_timeout_and_rejects_garbage() {
        for var in [ENV_API_KEY, ENV_BASE_URL, ENV_API_VERSION, ENV_TIMEOUT_SECS] {
            env::remove_var(var);
        }
        assert_eq!(ClientConfig::from_env().unwrap(), ClientConfig::default());

        env::set_var(ENV_API_KEY, "env-key");
        env::set_var(ENV_BASE_URL, "http://localhost:4000/");
        env::set_var(ENV_TIMEOUT_SECS, "2.5");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.base_url, "http://localhost:4000");
        assert_eq!(config.timeout, Duration::from_millis(2500));

        env::set_var(ENV_TIMEOUT_SECS, "soon");
        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));

        env::set_var(ENV_TIMEOUT_SECS, "-1");
        assert!(matches!(ClientConfig::from_env(), Err(ApiError::Config(_))));

        for var in [ENV_API_KEY, ENV_BASE_URL, ENV_TIMEOUT_SECS] {
            env::remove_var(var);
        }
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("key").with_base_url("http://localhost:3000/");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.api_key.as_deref(), Some("key"));
    }
}
