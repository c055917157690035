//! Storage capabilities the session layer is given
//!
//! Browsers provide per-tab `sessionStorage` and `document.cookie`; the
//! frontend crate wraps those. The in-memory versions here back tests and
//! any non-browser host.

use crate::cookie::{CookieMirror, parse_directive};
use crate::error::StoreError;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Ephemeral per-tab key/value storage
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str);
    /// Drop everything the store holds
    fn clear(&self);
}

/// Cookie jar as seen from script
pub trait CookieJar {
    /// All visible cookies in `name=value; name=value` form
    fn cookie_header(&self) -> String;
    /// Apply a `Set-Cookie` style directive
    fn write(&self, directive: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Cookie jar that applies directives the way a browser would
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: RefCell<BTreeMap<String, String>>,
    writes: RefCell<Vec<String>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a cookie
    pub fn get(&self, name: &str) -> Option<String> {
        self.cookies.borrow().get(name).cloned()
    }

    /// Every directive written so far, oldest first
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    /// Whether the mirror cookie is currently set
    pub fn has_mirror(&self, mirror: &CookieMirror) -> bool {
        mirror.read(&self.cookie_header()).is_some()
    }
}

impl CookieJar for MemoryCookieJar {
    fn cookie_header(&self) -> String {
        self.cookies
            .borrow()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write(&self, directive: &str) {
        self.writes.borrow_mut().push(directive.to_string());

        let Some(parsed) = parse_directive(directive) else {
            tracing::debug!(directive, "Ignoring malformed cookie directive");
            return;
        };

        let mut cookies = self.cookies.borrow_mut();
        if parsed.expired {
            cookies.remove(&parsed.name);
        } else {
            cookies.insert(parsed.name, parsed.value);
        }
    }
}
