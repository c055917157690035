//! Build-time configuration for the browser app
//!
//! There is no process environment in the browser, so overrides are baked in
//! at compile time from the same variables the native loader reads.

use shloksagar_core::SessionConfig;

/// Session configuration for this build, falling back to defaults when the
/// baked-in overrides do not validate
pub fn session_config() -> SessionConfig {
    let mut config = SessionConfig::default();

    if let Some(api_url) = option_env!("SHLOKSAGAR__API_URL") {
        config.api_url = api_url.trim_end_matches('/').to_string();
    }
    if let Some(admin_key) = option_env!("SHLOKSAGAR__ADMIN_KEY") {
        config.admin_key = Some(admin_key.to_string()).filter(|key| !key.is_empty());
    }
    if let Some(timeout) = option_env!("SHLOKSAGAR__TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        config.timeout_secs = timeout;
    }

    match config.validate() {
        Ok(()) => config,
        Err(error) => {
            tracing::error!(%error, "Invalid build configuration, using defaults");
            SessionConfig::default()
        }
    }
}
