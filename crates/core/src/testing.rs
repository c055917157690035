//! Test doubles for the session layer
//!
//! Enabled for this crate's own tests and, through the `tests` feature, for
//! anything that wants to drive a [`SessionGuard`] without a browser.

use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::cookie::CookieMirror;
use crate::guard::{Redirect, SessionGuard};
use crate::host::{ActivityEvent, GuardHost, Subscription};
use crate::session::{AdminIdentity, Session, Sessions};
use crate::store::{MemoryCookieJar, MemoryStore};
use crate::verify::{TokenVerifier, VerifyError};
use async_trait::async_trait;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use shloksagar_http::LoginResponse;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// 2023-11-14T22:13:20Z, a convenient round starting point
pub const T0: i64 = 1_700_000_000_000;

/// Clock that only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.now.set(self.now.get() + secs * 1000);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(T0)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

type TimerCallback = RefCell<Box<dyn FnMut()>>;

/// Host whose timers, listeners and tasks are driven by hand.
///
/// It only keeps weak references to callbacks, so once a [`Subscription`] is
/// dropped the callback can no longer be reached.
#[derive(Default)]
pub struct FakeHost {
    timers: RefCell<Vec<(Duration, Weak<TimerCallback>)>>,
    listeners: RefCell<Vec<(Vec<ActivityEvent>, Weak<dyn Fn()>)>>,
    tasks: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch `event`; returns how many listeners ran
    pub fn fire(&self, event: ActivityEvent) -> usize {
        let callbacks: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(events, _)| events.contains(&event))
            .filter_map(|(_, callback)| callback.upgrade())
            .collect();

        for callback in &callbacks {
            callback();
        }
        callbacks.len()
    }

    /// Fire every live timer once; returns how many ran
    pub fn tick(&self) -> usize {
        let callbacks: Vec<Rc<TimerCallback>> = self
            .timers
            .borrow()
            .iter()
            .filter_map(|(_, callback)| callback.upgrade())
            .collect();

        for callback in &callbacks {
            (callback.borrow_mut())();
        }
        callbacks.len()
    }

    /// Periods of the timers still alive
    pub fn live_timers(&self) -> Vec<Duration> {
        self.timers
            .borrow()
            .iter()
            .filter(|(_, callback)| callback.strong_count() > 0)
            .map(|(period, _)| *period)
            .collect()
    }

    pub fn live_listeners(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, callback)| callback.strong_count() > 0)
            .count()
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Take the spawned tasks without running them
    pub fn take_tasks(&self) -> Vec<LocalBoxFuture<'static, ()>> {
        self.tasks.borrow_mut().drain(..).collect()
    }

    /// Run every spawned task to completion, in spawn order
    pub async fn run_tasks(&self) {
        for task in self.take_tasks() {
            task.await;
        }
    }
}

impl GuardHost for FakeHost {
    fn every(&self, period: Duration, callback: Box<dyn FnMut()>) -> Subscription {
        let callback: Rc<TimerCallback> = Rc::new(RefCell::new(callback));
        self.timers
            .borrow_mut()
            .push((period, Rc::downgrade(&callback)));
        Subscription::new(callback)
    }

    fn listen(&self, events: &[ActivityEvent], callback: Rc<dyn Fn()>) -> Subscription {
        self.listeners
            .borrow_mut()
            .push((events.to_vec(), Rc::downgrade(&callback)));
        Subscription::new(callback)
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.tasks.borrow_mut().push(task);
    }
}

/// Verifier whose answers are released by the test.
///
/// Each call consumes the oldest open gate; with no gate open the token is
/// accepted straight away.
#[derive(Default)]
pub struct GatedVerifier {
    gates: Mutex<VecDeque<oneshot::Receiver<Result<(), VerifyError>>>>,
    tokens: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl GatedVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a gate; the next verification waits until the sender answers
    pub fn gate(&self) -> oneshot::Sender<Result<(), VerifyError>> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Tokens seen so far
    pub fn tokens(&self) -> Vec<String> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TokenVerifier for GatedVerifier {
    async fn verify(&self, token: &str) -> Result<(), VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(token.to_string());

        let gate = self
            .gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match gate {
            Some(gate) => gate
                .await
                .unwrap_or_else(|_| Err(VerifyError::Transport("gate dropped".to_string()))),
            None => Ok(()),
        }
    }
}

/// Collects redirects emitted through `on_redirect`
#[derive(Clone, Default)]
pub struct RedirectLog {
    redirects: Rc<RefCell<Vec<Redirect>>>,
}

impl RedirectLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sink(&self) -> Rc<dyn Fn(Redirect)> {
        let redirects = Rc::clone(&self.redirects);
        Rc::new(move |redirect| redirects.borrow_mut().push(redirect))
    }

    pub fn all(&self) -> Vec<Redirect> {
        self.redirects.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.redirects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.redirects.borrow().is_empty()
    }
}

/// A guard wired to in-memory storage and a manual clock
pub struct GuardFixture<V> {
    pub config: SessionConfig,
    pub store: Rc<MemoryStore>,
    pub cookies: Rc<MemoryCookieJar>,
    pub clock: ManualClock,
    pub verifier: Rc<V>,
    pub guard: Rc<SessionGuard>,
}

impl<V: TokenVerifier + 'static> GuardFixture<V> {
    pub fn new(verifier: V) -> Self {
        Self::with_config(SessionConfig::default(), verifier)
    }

    pub fn with_config(config: SessionConfig, verifier: V) -> Self {
        let store = Rc::new(MemoryStore::new());
        let cookies = Rc::new(MemoryCookieJar::new());
        let clock = ManualClock::default();
        let verifier = Rc::new(verifier);

        let sessions = Sessions::new(
            store.clone(),
            cookies.clone(),
            CookieMirror::new(config.cookie_name.clone()),
        );
        let guard = Rc::new(SessionGuard::new(
            config.clone(),
            sessions,
            Rc::new(clock.clone()),
            verifier.clone(),
        ));

        Self {
            config,
            store,
            cookies,
            clock,
            verifier,
            guard,
        }
    }

    pub fn sessions(&self) -> &Sessions {
        self.guard.sessions()
    }

    /// Start a session at the clock's current time
    pub fn sign_in(&self) -> Session {
        self.sign_in_at(self.clock.now_ms())
    }

    pub fn sign_in_at(&self, at_ms: i64) -> Session {
        self.sessions()
            .begin(&sample_login(), at_ms)
            .unwrap_or_else(|error| panic!("memory store refused session: {error}"))
    }
}

pub fn sample_login() -> LoginResponse {
    LoginResponse {
        token: "tok-fixture".to_string(),
        admin: AdminIdentity {
            email: "seva@shloksagar.in".to_string(),
            name: "Seva Admin".to_string(),
        },
    }
}
