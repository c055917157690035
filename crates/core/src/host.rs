//! What the guard needs from its runtime while a protected view is mounted
//!
//! In the browser these are `setInterval`, `addEventListener` on the window
//! and `spawn_local`. Every registration hands back a [`Subscription`];
//! dropping it is the only way to release the timer or listener.

use futures::future::LocalBoxFuture;
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// User interactions that count as activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityEvent {
    PointerDown,
    KeyDown,
    Scroll,
    TouchStart,
}

impl ActivityEvent {
    pub const ALL: [Self; 4] = [Self::PointerDown, Self::KeyDown, Self::Scroll, Self::TouchStart];

    /// DOM event type
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::PointerDown => "mousedown",
            Self::KeyDown => "keydown",
            Self::Scroll => "scroll",
            Self::TouchStart => "touchstart",
        }
    }
}

/// Owned handle to a timer or listener; dropping it releases the registration
pub struct Subscription {
    _handle: Box<dyn Any>,
}

impl Subscription {
    pub fn new<H: 'static>(handle: H) -> Self {
        Self {
            _handle: Box::new(handle),
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

pub trait GuardHost {
    /// Call `callback` every `period` until the subscription is dropped
    fn every(&self, period: Duration, callback: Box<dyn FnMut()>) -> Subscription;

    /// Call `callback` on each of `events` until the subscription is dropped
    fn listen(&self, events: &[ActivityEvent], callback: Rc<dyn Fn()>) -> Subscription;

    /// Run a task on the current thread
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}
