//! Login view flow

use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::session::Sessions;
use shloksagar_http::LoginResponse;
use std::rc::Rc;

/// Query parameter set when the user was signed out for inactivity
pub const EXPIRED_PARAM: &str = "expired";

/// Notice shown on the login view after an inactivity logout
pub const EXPIRED_NOTICE: &str = "Session expired. Please login again.";

pub struct LoginFlow {
    config: SessionConfig,
    sessions: Sessions,
    clock: Rc<dyn Clock>,
}

impl LoginFlow {
    pub fn new(config: SessionConfig, sessions: Sessions, clock: Rc<dyn Clock>) -> Self {
        Self {
            config,
            sessions,
            clock,
        }
    }

    /// Called when the login view mounts.
    ///
    /// Drops whatever the tab still holds and reports whether the view was
    /// reached through an inactivity logout.
    pub fn enter(&self, query: &str) -> bool {
        self.sessions.reset();
        expired_flag(query)
    }

    /// Store the session from a successful login; returns where to go next
    pub fn complete(&self, response: &LoginResponse) -> Result<String> {
        self.sessions.begin(response, self.clock.now_ms())?;
        Ok(self.config.home_path.clone())
    }
}

/// Whether `query` carries `expired=true`; a leading `?` is accepted
pub fn expired_flag(query: &str) -> bool {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .any(|(key, value)| key == EXPIRED_PARAM && value == "true")
}
