//! Session layer configuration

use crate::error::ConfigError;
#[cfg(not(target_arch = "wasm32"))]
use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Prefix for environment overrides, e.g. `SHLOKSAGAR__TIMEOUT_SECS=900`
pub const ENV_PREFIX: &str = "SHLOKSAGAR";

/// Configuration shared by the session guard, route guard and login flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Base URL of the backend API, without the `/admin` suffix
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Static admin key sent with admin requests, if the backend wants one
    #[serde(default)]
    pub admin_key: Option<String>,
    /// Path of the login view; the only public route
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Where a successful login lands
    #[serde(default = "default_home_path")]
    pub home_path: String,
    /// Inactivity timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Interval between periodic expiry checks in seconds
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    /// Name of the cookie that mirrors the token for the route guard
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_api_url() -> String {
    shloksagar_http::client::DEFAULT_API_URL.to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_home_path() -> String {
    "/dashboard".to_string()
}

const fn default_timeout_secs() -> u64 {
    30 * 60
}

const fn default_check_interval_secs() -> u64 {
    60
}

fn default_cookie_name() -> String {
    "adminToken".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            admin_key: None,
            login_path: default_login_path(),
            home_path: default_home_path(),
            timeout_secs: default_timeout_secs(),
            check_interval_secs: default_check_interval_secs(),
            cookie_name: default_cookie_name(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from defaults overlaid with `SHLOKSAGAR__*` environment variables
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> crate::Result<Self> {
        let config = Self::from_environment()?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_environment() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Inactivity timeout
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Inactivity timeout in milliseconds, for timestamp arithmetic
    pub fn timeout_ms(&self) -> i64 {
        i64::try_from(self.timeout_secs.saturating_mul(1000)).unwrap_or(i64::MAX)
    }

    /// Interval between periodic expiry checks
    pub const fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.check_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "check_interval_secs must be greater than zero".to_string(),
            ));
        }
        if !self.login_path.starts_with('/') {
            return Err(ConfigError::Invalid(
                "login_path must be an absolute path".to_string(),
            ));
        }
        if self.cookie_name.is_empty()
            || self
                .cookie_name
                .contains(|c: char| c == '=' || c == ';' || c.is_whitespace())
        {
            return Err(ConfigError::Invalid(
                "cookie_name must be a plain cookie token".to_string(),
            ));
        }
        if self.api_url.is_empty() {
            return Err(ConfigError::Invalid("api_url must be set".to_string()));
        }
        Ok(())
    }
}
