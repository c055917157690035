//! Cookie mirror of the session token
//!
//! Per-tab storage is invisible to navigation-time checks, so the token is
//! copied into a cookie purely so the [`RouteGuard`](crate::route::RouteGuard)
//! can see that a session exists. The cookie carries no expiry of its own and
//! lives for the browser session.

use chrono::{DateTime, Utc};

/// `expires` value used to delete the cookie
pub const EPOCH_EXPIRY: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Formats and reads the mirror cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieMirror {
    name: String,
}

impl CookieMirror {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Session-lifetime cookie carrying the token
    pub fn set_directive(&self, token: &str) -> String {
        format!("{}={token}; path=/; SameSite=Strict", self.name)
    }

    /// Directive that makes the browser drop the cookie immediately
    pub fn clear_directive(&self) -> String {
        format!("{}=; path=/; expires={EPOCH_EXPIRY}", self.name)
    }

    /// Read the mirrored token out of a `Cookie` header style string
    pub fn read(&self, cookie_header: &str) -> Option<String> {
        cookie_header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| name.trim() == self.name)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// A parsed `Set-Cookie` style directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub value: String,
    /// The directive deletes the cookie (past `expires` or non-positive `max-age`)
    pub expired: bool,
}

/// Parse a directive as written to `document.cookie`
pub fn parse_directive(directive: &str) -> Option<Directive> {
    let mut parts = directive.split(';');
    let (name, value) = parts.next()?.trim().split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let now = Utc::now();
    let expired = parts.filter_map(|attr| attr.trim().split_once('=')).any(
        |(key, value)| match key.trim().to_ascii_lowercase().as_str() {
            "expires" => DateTime::parse_from_rfc2822(value.trim())
                .map(|at| at.with_timezone(&Utc) <= now)
                .unwrap_or(false),
            "max-age" => value.trim().parse::<i64>().is_ok_and(|age| age <= 0),
            _ => false,
        },
    );

    Some(Directive {
        name: name.to_string(),
        value: value.trim().to_string(),
        expired,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_directive() {
        let mirror = CookieMirror::new("adminToken");
        assert_eq!(
            mirror.set_directive("abc.def"),
            "adminToken=abc.def; path=/; SameSite=Strict"
        );
        let parsed = parse_directive(&mirror.set_directive("abc.def")).unwrap();
        assert_eq!(parsed.value, "abc.def");
        assert!(!parsed.expired);
    }

    #[test]
    fn test_clear_directive_is_expired() {
        let mirror = CookieMirror::new("adminToken");
        assert_eq!(
            mirror.clear_directive(),
            "adminToken=; path=/; expires=Thu, 01 Jan 1970 00:00:00 GMT"
        );
        let parsed = parse_directive(&mirror.clear_directive()).unwrap();
        assert_eq!(parsed.name, "adminToken");
        assert!(parsed.expired);
    }

    #[test]
    fn test_max_age_zero_is_expired() {
        let parsed = parse_directive("adminToken=x; Max-Age=0").unwrap();
        assert!(parsed.expired);
    }

    #[test]
    fn test_read_from_header() {
        let mirror = CookieMirror::new("adminToken");
        assert_eq!(
            mirror.read("theme=dark; adminToken=tok-1; lang=hi").as_deref(),
            Some("tok-1")
        );
        assert_eq!(mirror.read("theme=dark"), None);
        assert_eq!(mirror.read("adminToken="), None);
        assert_eq!(mirror.read(""), None);
    }

    #[test]
    fn test_read_ignores_prefixed_names() {
        let mirror = CookieMirror::new("adminToken");
        assert_eq!(mirror.read("xadminToken=tok-1"), None);
    }
}
