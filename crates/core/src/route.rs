//! Navigation-time route guard
//!
//! Runs before a route renders and only sees cookies, never per-tab storage.
//! It answers one question: does a token mirror exist? Whether that token is
//! still good is the [`SessionGuard`](crate::guard::SessionGuard)'s job.

use crate::config::SessionConfig;
use crate::cookie::CookieMirror;

/// Prefixes served without a session
const ASSET_PREFIXES: &[&str] = &["/static/", "/assets/"];

/// Exact asset paths served without a session
const ASSET_PATHS: &[&str] = &["/favicon.ico"];

/// Image extensions served without a session
const IMAGE_EXTENSIONS: &[&str] = &["svg", "png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    /// Send the browser to this location instead
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    public_paths: Vec<String>,
    login_path: String,
    mirror: CookieMirror,
}

impl RouteGuard {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            public_paths: vec![config.login_path.clone()],
            login_path: config.login_path.clone(),
            mirror: CookieMirror::new(config.cookie_name.clone()),
        }
    }

    pub fn check(&self, path: &str, cookie_header: &str) -> RouteDecision {
        let path = strip_query(path);

        if self.is_public(path) || is_asset(path) {
            return RouteDecision::Allow;
        }

        if self.mirror.read(cookie_header).is_some() {
            RouteDecision::Allow
        } else {
            tracing::debug!(path, "No token cookie, redirecting to login");
            RouteDecision::Redirect(self.login_path.clone())
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        let path = strip_query(path);
        self.public_paths.iter().any(|public| public == path)
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn is_asset(path: &str) -> bool {
    if ASSET_PATHS.contains(&path) || ASSET_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return true;
    }

    let file = path.rsplit('/').next().unwrap_or(path);
    file.rsplit_once('.')
        .filter(|(stem, _)| !stem.is_empty())
        .is_some_and(|(_, ext)| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}
