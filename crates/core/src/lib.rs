//! Session lifecycle for the ShlokSagar admin console
//!
//! Platform independent: storage, cookies, time and the runtime's timers and
//! listeners are all passed in, so the same guard runs in the browser and in
//! native tests.

pub mod clock;
pub mod config;
pub mod cookie;
pub mod error;
pub mod guard;
pub mod host;
pub mod login;
pub mod route;
pub mod session;
pub mod store;
pub mod verify;

#[cfg(any(test, feature = "tests"))]
pub mod testing;

pub use clock::{Clock, SystemClock};
pub use config::SessionConfig;
pub use cookie::CookieMirror;
pub use error::{ConfigError, Error, Result, StoreError};
pub use guard::{
    ActiveMount, GuardState, Mount, MountId, Redirect, RedirectReason, SessionGuard,
    SessionOutcome,
};
pub use host::{ActivityEvent, GuardHost, Subscription};
pub use login::LoginFlow;
pub use route::{RouteDecision, RouteGuard};
pub use session::{AdminIdentity, Session, Sessions};
pub use store::{CookieJar, MemoryCookieJar, MemoryStore, SessionStore};
pub use verify::{ApiVerifier, TokenVerifier, VerifyError};
