//! The admin session as kept in per-tab storage

use crate::cookie::CookieMirror;
use crate::error::StoreError;
use crate::store::{CookieJar, SessionStore};
pub use shloksagar_http::AdminIdentity;
use shloksagar_http::LoginResponse;
use std::rc::Rc;

/// Storage keys used for the session fields
pub mod keys {
    pub const TOKEN: &str = "adminToken";
    pub const EMAIL: &str = "adminEmail";
    pub const NAME: &str = "adminName";
    pub const STARTED_AT: &str = "sessionStartTime";
    pub const LAST_ACTIVITY: &str = "lastActivity";

    pub const ALL: [&str; 5] = [TOKEN, EMAIL, NAME, STARTED_AT, LAST_ACTIVITY];
}

/// Snapshot of the stored session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub identity: Option<AdminIdentity>,
    /// Login time in epoch milliseconds, if recorded
    pub started_at: Option<i64>,
    /// Last observed activity in epoch milliseconds, if recorded
    pub last_activity_at: Option<i64>,
}

/// Milliseconds left before a session last active at `last_activity_at`
/// times out; zero is still valid, negative is expired.
fn remaining_ms(
    last_activity_at: Option<i64>,
    now_ms: i64,
    timeout_ms: i64,
) -> Option<i64> {
    last_activity_at.map(|last| timeout_ms.saturating_sub(now_ms.saturating_sub(last)))
}

/// A session without a recorded activity time counts as expired
fn is_expired(last_activity_at: Option<i64>, now_ms: i64, timeout_ms: i64) -> bool {
    remaining_ms(last_activity_at, now_ms, timeout_ms).is_none_or(|left| left < 0)
}

/// Storage-backed access to the one session a tab can hold
#[derive(Clone)]
pub struct Sessions {
    store: Rc<dyn SessionStore>,
    cookies: Rc<dyn CookieJar>,
    mirror: CookieMirror,
}

impl Sessions {
    pub fn new(
        store: Rc<dyn SessionStore>,
        cookies: Rc<dyn CookieJar>,
        mirror: CookieMirror,
    ) -> Self {
        Self {
            store,
            cookies,
            mirror,
        }
    }

    pub const fn mirror(&self) -> &CookieMirror {
        &self.mirror
    }

    /// Write a freshly issued session and its cookie mirror.
    ///
    /// If any field cannot be stored, whatever was written is removed again
    /// before the error is returned.
    pub fn begin(&self, login: &LoginResponse, now_ms: i64) -> Result<Session, StoreError> {
        if let Err(error) = self.write_fields(login, now_ms) {
            tracing::warn!(%error, "Could not store admin session");
            self.clear();
            return Err(error);
        }
        self.cookies.write(&self.mirror.set_directive(&login.token));

        tracing::info!(email = %login.admin.email, "Admin session started");

        Ok(Session {
            token: login.token.clone(),
            identity: Some(login.admin.clone()),
            started_at: Some(now_ms),
            last_activity_at: Some(now_ms),
        })
    }

    fn write_fields(&self, login: &LoginResponse, now_ms: i64) -> Result<(), StoreError> {
        let now = now_ms.to_string();
        self.store.set(keys::TOKEN, &login.token)?;
        self.store.set(keys::EMAIL, &login.admin.email)?;
        self.store.set(keys::NAME, &login.admin.name)?;
        self.store.set(keys::STARTED_AT, &now)?;
        self.store.set(keys::LAST_ACTIVITY, &now)
    }

    /// The stored token, if a session is present
    pub fn token(&self) -> Option<String> {
        self.store.get(keys::TOKEN).filter(|t| !t.is_empty())
    }

    pub fn last_activity(&self) -> Option<i64> {
        self.read_timestamp(keys::LAST_ACTIVITY)
    }

    pub fn load(&self) -> Option<Session> {
        let token = self.token()?;
        let identity = self.store.get(keys::EMAIL).map(|email| AdminIdentity {
            email,
            name: self.store.get(keys::NAME).unwrap_or_default(),
        });

        Some(Session {
            token,
            identity,
            started_at: self.read_timestamp(keys::STARTED_AT),
            last_activity_at: self.last_activity(),
        })
    }

    /// Expiry check against the stored activity time
    pub fn is_expired(&self, now_ms: i64, timeout_ms: i64) -> bool {
        is_expired(self.last_activity(), now_ms, timeout_ms)
    }

    /// Time left before the stored session idles out, `None` without a
    /// recorded activity time
    pub fn remaining_ms(&self, now_ms: i64, timeout_ms: i64) -> Option<i64> {
        remaining_ms(self.last_activity(), now_ms, timeout_ms)
    }

    /// Record activity at `now_ms`.
    ///
    /// The stored time never moves backwards; returns the value now stored.
    pub fn touch(&self, now_ms: i64) -> Result<i64, StoreError> {
        let next = self
            .last_activity()
            .map_or(now_ms, |current| current.max(now_ms));
        self.store.set(keys::LAST_ACTIVITY, &next.to_string())?;
        Ok(next)
    }

    /// Remove every session field and expire the cookie mirror.
    ///
    /// Safe to call when nothing is stored.
    pub fn clear(&self) {
        for key in keys::ALL {
            self.store.remove(key);
        }
        self.cookies.write(&self.mirror.clear_directive());
    }

    /// Wipe the whole per-tab store, not just the session fields
    pub fn reset(&self) {
        self.store.clear();
        self.cookies.write(&self.mirror.clear_directive());
    }

    fn read_timestamp(&self, key: &str) -> Option<i64> {
        self.store.get(key).and_then(|raw| raw.trim().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryCookieJar, MemoryStore};
    use std::cell::Cell;

    const T: i64 = 1_700_000_000_000;
    const TIMEOUT: i64 = 1_800_000;

    fn fixture() -> (Sessions, Rc<MemoryStore>, Rc<MemoryCookieJar>) {
        let store = Rc::new(MemoryStore::new());
        let jar = Rc::new(MemoryCookieJar::new());
        let sessions = Sessions::new(
            store.clone(),
            jar.clone(),
            CookieMirror::new("adminToken"),
        );
        (sessions, store, jar)
    }

    fn login() -> LoginResponse {
        LoginResponse {
            token: "tok-1".to_string(),
            admin: AdminIdentity {
                email: "seva@shloksagar.in".to_string(),
                name: "Seva".to_string(),
            },
        }
    }

    /// Accepts a fixed number of writes, then refuses
    struct RejectingStore {
        inner: MemoryStore,
        writes_left: Cell<usize>,
    }

    impl RejectingStore {
        fn after(writes: usize) -> Self {
            Self {
                inner: MemoryStore::new(),
                writes_left: Cell::new(writes),
            }
        }
    }

    impl SessionStore for RejectingStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            match self.writes_left.get() {
                0 => Err(StoreError::Unavailable),
                left => {
                    self.writes_left.set(left - 1);
                    self.inner.set(key, value)
                }
            }
        }

        fn remove(&self, key: &str) {
            self.inner.remove(key);
        }

        fn clear(&self) {
            self.inner.clear();
        }
    }

    #[test]
    fn test_begin_writes_all_fields() {
        let (sessions, store, jar) = fixture();
        let session = sessions.begin(&login(), T).unwrap();

        assert_eq!(session.started_at, Some(T));
        assert_eq!(store.get(keys::TOKEN).as_deref(), Some("tok-1"));
        assert_eq!(store.get(keys::EMAIL).as_deref(), Some("seva@shloksagar.in"));
        assert_eq!(store.get(keys::LAST_ACTIVITY), Some(T.to_string()));
        assert_eq!(jar.get("adminToken").as_deref(), Some("tok-1"));
        assert_eq!(sessions.load(), Some(session));
    }

    #[test]
    fn test_expiry_boundary() {
        let (sessions, _, _) = fixture();
        sessions.begin(&login(), T).unwrap();

        assert!(!sessions.is_expired(T + 1_799_000, TIMEOUT));
        assert!(!sessions.is_expired(T + TIMEOUT, TIMEOUT));
        assert!(sessions.is_expired(T + 1_801_000, TIMEOUT));
    }

    #[test]
    fn test_begin_rolls_back_partial_write() {
        let store = Rc::new(RejectingStore::after(1));
        let jar = Rc::new(MemoryCookieJar::new());
        let sessions = Sessions::new(
            store.clone(),
            jar.clone(),
            CookieMirror::new("adminToken"),
        );

        assert_eq!(sessions.begin(&login(), T), Err(StoreError::Unavailable));

        assert_eq!(sessions.token(), None);
        assert_eq!(sessions.last_activity(), None);
        assert_eq!(sessions.load(), None);
        assert!(store.inner.is_empty());
        assert_eq!(jar.get("adminToken"), None);
        assert!(!jar.has_mirror(sessions.mirror()));
    }

    #[test]
    fn test_remaining_ms_counts_down() {
        let (sessions, _, _) = fixture();
        sessions.begin(&login(), T).unwrap();

        assert_eq!(sessions.remaining_ms(T, TIMEOUT), Some(TIMEOUT));
        assert_eq!(sessions.remaining_ms(T + 1_799_000, TIMEOUT), Some(1_000));
        assert_eq!(sessions.remaining_ms(T + 1_800_000, TIMEOUT), Some(0));
        assert!(!sessions.is_expired(T + 1_800_000, TIMEOUT));
        assert_eq!(sessions.remaining_ms(T + 1_801_000, TIMEOUT), Some(-1_000));
        assert!(sessions.is_expired(T + 1_801_000, TIMEOUT));
    }

    #[test]
    fn test_remaining_ms_without_activity() {
        let (sessions, store, _) = fixture();
        store.set(keys::TOKEN, "tok-1").unwrap();
        assert_eq!(sessions.remaining_ms(T, TIMEOUT), None);

        store.set(keys::LAST_ACTIVITY, "garbage").unwrap();
        assert_eq!(sessions.remaining_ms(T, TIMEOUT), None);
    }

    #[test]
    fn test_missing_activity_counts_as_expired() {
        let (sessions, store, _) = fixture();
        store.set(keys::TOKEN, "tok-1").unwrap();
        assert!(sessions.is_expired(T, TIMEOUT));

        store.set(keys::LAST_ACTIVITY, "not-a-number").unwrap();
        assert!(sessions.is_expired(T, TIMEOUT));
    }

    #[test]
    fn test_touch_is_monotonic() {
        let (sessions, _, _) = fixture();
        sessions.begin(&login(), T).unwrap();

        assert_eq!(sessions.touch(T + 1_000).unwrap(), T + 1_000);
        assert_eq!(sessions.touch(T + 500).unwrap(), T + 1_000);
        assert_eq!(sessions.last_activity(), Some(T + 1_000));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (sessions, store, jar) = fixture();
        store.set("unrelated", "keep").unwrap();
        sessions.begin(&login(), T).unwrap();

        sessions.clear();
        sessions.clear();

        assert_eq!(sessions.load(), None);
        for key in keys::ALL {
            assert_eq!(store.get(key), None);
        }
        assert_eq!(store.get("unrelated").as_deref(), Some("keep"));
        assert_eq!(jar.get("adminToken"), None);
    }

    #[test]
    fn test_reset_wipes_store() {
        let (sessions, store, _) = fixture();
        store.set("unrelated", "gone").unwrap();
        sessions.begin(&login(), T).unwrap();

        sessions.reset();
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_token_is_absent() {
        let (sessions, store, _) = fixture();
        store.set(keys::TOKEN, "").unwrap();
        assert_eq!(sessions.token(), None);
        assert_eq!(sessions.load(), None);
    }
}
