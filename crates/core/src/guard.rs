//! Session guard for protected views
//!
//! Every protected view goes through [`SessionGuard::start`] when it mounts:
//!
//! 1. a synchronous check (token present, not idle past the timeout) that can
//!    redirect immediately,
//! 2. an asynchronous verification of the token against the backend,
//! 3. activity listeners and a periodic expiry check that live exactly as long
//!    as the returned [`ActiveMount`].
//!
//! The guard never navigates by itself. Decisions come back as
//! [`SessionOutcome`] / [`Redirect`] values and the caller performs them.

use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::host::{ActivityEvent, GuardHost, Subscription};
use crate::session::Sessions;
use crate::verify::TokenVerifier;
use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Unauthenticated,
    Checking,
    Active,
    Expired,
}

/// Why the user is being sent to the login view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// No token stored
    NoSession,
    /// Idle longer than the timeout; the only reason the login view is told about
    Expired,
    /// Backend rejected the token, or could not be reached
    Invalid,
    /// Explicit logout
    LoggedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub path: String,
    pub reason: RedirectReason,
}

impl Redirect {
    /// Whether the login view should show the "session expired" notice
    pub fn is_expired(&self) -> bool {
        self.reason == RedirectReason::Expired
    }

    /// Path plus query to navigate to
    pub fn location(&self) -> String {
        if self.is_expired() {
            format!("{}?expired=true", self.path)
        } else {
            self.path.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Session present, fresh and (so far) accepted
    Valid,
    /// The guard does not run on this view
    Bypassed,
    /// The mount this result belongs to is gone; nothing was changed
    Detached,
    RedirectTo(Redirect),
}

/// Identifies one activation of the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(u64);

/// Result of [`SessionGuard::start`]
#[derive(Debug)]
pub enum Mount {
    /// Login view; no checks, no subscriptions
    Bypassed,
    /// Synchronous check failed; navigate now
    Redirected(Redirect),
    Active(ActiveMount),
}

/// Listeners and timer of a mounted protected view.
///
/// Dropping it (or calling [`ActiveMount::stop`]) releases every subscription
/// and retires the mount, so late events, ticks and verification results from
/// this view have no effect.
pub struct ActiveMount {
    id: MountId,
    guard: Weak<SessionGuard>,
    subscriptions: Vec<Subscription>,
}

impl ActiveMount {
    pub const fn id(&self) -> MountId {
        self.id
    }

    pub fn stop(self) {}
}

impl Drop for ActiveMount {
    fn drop(&mut self) {
        self.subscriptions.clear();
        if let Some(guard) = self.guard.upgrade() {
            guard.detach(self.id);
        }
    }
}

impl fmt::Debug for ActiveMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveMount")
            .field("id", &self.id)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

pub struct SessionGuard {
    config: SessionConfig,
    sessions: Sessions,
    clock: Rc<dyn Clock>,
    verifier: Rc<dyn TokenVerifier>,
    state: Cell<GuardState>,
    current: Cell<Option<MountId>>,
    next_id: Cell<u64>,
}

impl SessionGuard {
    pub fn new(
        config: SessionConfig,
        sessions: Sessions,
        clock: Rc<dyn Clock>,
        verifier: Rc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            config,
            sessions,
            clock,
            verifier,
            state: Cell::new(GuardState::Unauthenticated),
            current: Cell::new(None),
            next_id: Cell::new(0),
        }
    }

    pub fn state(&self) -> GuardState {
        self.state.get()
    }

    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub const fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    /// Milliseconds before the stored session idles out at the current time.
    ///
    /// Read-only: looking does not count as activity. `None` when no
    /// activity time is stored.
    pub fn time_left(&self) -> Option<i64> {
        self.sessions
            .remaining_ms(self.clock.now_ms(), self.config.timeout_ms())
    }

    /// Mount currently allowed to change session state
    pub fn current_mount(&self) -> Option<MountId> {
        self.current.get()
    }

    /// Synchronous part of the mount check.
    ///
    /// Returns `Valid` (and records activity) when a fresh token is stored.
    pub fn check(&self, path: &str) -> SessionOutcome {
        if self.is_login_path(path) {
            tracing::trace!(path, "Login view, session guard bypassed");
            return SessionOutcome::Bypassed;
        }

        self.set_state(GuardState::Checking);

        if self.sessions.token().is_none() {
            self.set_state(GuardState::Unauthenticated);
            return self.redirect(RedirectReason::NoSession);
        }

        let now = self.clock.now_ms();
        if self.sessions.is_expired(now, self.config.timeout_ms()) {
            tracing::info!(path, "Admin session expired");
            self.sessions.clear();
            self.set_state(GuardState::Expired);
            return self.redirect(RedirectReason::Expired);
        }

        self.touch(now);
        self.set_state(GuardState::Active);
        SessionOutcome::Valid
    }

    /// Asynchronous part of the mount check.
    ///
    /// A rejection or transport failure clears the session. If the mount was
    /// retired or the session left `Active` while the request was in flight,
    /// the result is dropped and `Detached` returned.
    pub async fn verify(&self, mount: MountId) -> SessionOutcome {
        if !self.is_live(mount) {
            return SessionOutcome::Detached;
        }

        let Some(token) = self.sessions.token() else {
            self.set_state(GuardState::Unauthenticated);
            return self.redirect(RedirectReason::NoSession);
        };

        let verifier = Rc::clone(&self.verifier);
        let result = verifier.verify(&token).await;

        if !self.is_live(mount) {
            tracing::debug!(?mount, "Verification finished after the view moved on");
            return SessionOutcome::Detached;
        }

        match result {
            Ok(()) => {
                self.touch(self.clock.now_ms());
                SessionOutcome::Valid
            }
            Err(error) => {
                tracing::warn!(%error, "Session verification failed, signing out");
                self.sessions.clear();
                self.set_state(GuardState::Unauthenticated);
                self.redirect(RedirectReason::Invalid)
            }
        }
    }

    /// Refresh the activity time; ignored unless `mount` is live
    pub fn record_activity(&self, mount: MountId) -> bool {
        if !self.is_live(mount) {
            return false;
        }
        self.touch(self.clock.now_ms());
        true
    }

    /// Periodic expiry check
    pub fn poll_expiry(&self, mount: MountId) -> SessionOutcome {
        if !self.is_live(mount) {
            return SessionOutcome::Detached;
        }

        if self
            .sessions
            .is_expired(self.clock.now_ms(), self.config.timeout_ms())
        {
            tracing::info!("Admin session expired while idle");
            self.sessions.clear();
            self.set_state(GuardState::Expired);
            return self.redirect(RedirectReason::Expired);
        }

        SessionOutcome::Valid
    }

    /// Clear the session from any state
    pub fn logout(&self) -> SessionOutcome {
        self.sessions.clear();
        self.set_state(GuardState::Unauthenticated);
        tracing::info!("Admin signed out");
        self.redirect(RedirectReason::LoggedOut)
    }

    /// Run the mount check for `path` and, if the session is good, subscribe
    /// activity listeners and the expiry timer and start verification.
    ///
    /// Redirects decided after this returns (failed verification, expiry) are
    /// passed to `on_redirect`.
    pub fn start(
        self: &Rc<Self>,
        path: &str,
        host: &dyn GuardHost,
        on_redirect: Rc<dyn Fn(Redirect)>,
    ) -> Mount {
        match self.check(path) {
            SessionOutcome::Valid => {}
            SessionOutcome::RedirectTo(redirect) => return Mount::Redirected(redirect),
            SessionOutcome::Bypassed | SessionOutcome::Detached => return Mount::Bypassed,
        }

        let id = self.attach();
        let weak = Rc::downgrade(self);

        {
            let guard = Rc::clone(self);
            let on_redirect = Rc::clone(&on_redirect);
            host.spawn(Box::pin(async move {
                if let SessionOutcome::RedirectTo(redirect) = guard.verify(id).await {
                    on_redirect(redirect);
                }
            }));
        }

        let activity = {
            let weak = weak.clone();
            host.listen(
                &ActivityEvent::ALL,
                Rc::new(move || {
                    if let Some(guard) = weak.upgrade() {
                        guard.record_activity(id);
                    }
                }),
            )
        };

        let expiry = {
            let weak = weak.clone();
            host.every(
                self.config.check_interval(),
                Box::new(move || {
                    let Some(guard) = weak.upgrade() else {
                        return;
                    };
                    if let SessionOutcome::RedirectTo(redirect) = guard.poll_expiry(id) {
                        on_redirect(redirect);
                    }
                }),
            )
        };

        Mount::Active(ActiveMount {
            id,
            guard: weak,
            subscriptions: vec![activity, expiry],
        })
    }

    fn attach(&self) -> MountId {
        let id = MountId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        if let Some(previous) = self.current.replace(Some(id)) {
            tracing::debug!(?previous, "Replacing mount that was never stopped");
        }
        tracing::debug!(?id, "Session guard mounted");
        id
    }

    fn detach(&self, id: MountId) {
        if self.current.get() == Some(id) {
            self.current.set(None);
            tracing::debug!(?id, "Session guard unmounted");
        }
    }

    fn is_live(&self, mount: MountId) -> bool {
        self.current.get() == Some(mount) && self.state.get() == GuardState::Active
    }

    fn is_login_path(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        path == self.config.login_path
    }

    fn touch(&self, now: i64) {
        if let Err(error) = self.sessions.touch(now) {
            tracing::warn!(%error, "Could not record session activity");
        }
    }

    fn set_state(&self, next: GuardState) {
        let previous = self.state.replace(next);
        if previous != next {
            tracing::debug!(?previous, ?next, "Session guard state changed");
        }
    }

    fn redirect(&self, reason: RedirectReason) -> SessionOutcome {
        SessionOutcome::RedirectTo(Redirect {
            path: self.config.login_path.clone(),
            reason,
        })
    }
}
