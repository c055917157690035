//! Browser implementations of the session layer's capabilities

use futures::future::LocalBoxFuture;
use gloo_events::EventListener;
use gloo_timers::callback::Interval;
use shloksagar_core::{
    ActivityEvent, CookieJar, GuardHost, SessionStore, StoreError, Subscription,
};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, Storage};

/// `window.sessionStorage`
#[derive(Debug, Clone, Default)]
pub struct BrowserSessionStore {
    storage: Option<Storage>,
}

impl BrowserSessionStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.session_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("sessionStorage unavailable, sessions will not persist");
        }
        Self { storage }
    }
}

impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|error| StoreError::WriteRejected {
                key: key.to_string(),
                message: format!("{error:?}"),
            })
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.remove_item(key);
        }
    }

    fn clear(&self) {
        if let Some(storage) = &self.storage {
            let _ = storage.clear();
        }
    }
}

/// `document.cookie`
#[derive(Debug, Clone, Default)]
pub struct DocumentCookieJar {
    document: Option<HtmlDocument>,
}

impl DocumentCookieJar {
    pub fn new() -> Self {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<HtmlDocument>().ok());
        Self { document }
    }
}

impl CookieJar for DocumentCookieJar {
    fn cookie_header(&self) -> String {
        self.document
            .as_ref()
            .and_then(|d| d.cookie().ok())
            .unwrap_or_default()
    }

    fn write(&self, directive: &str) {
        let Some(document) = &self.document else {
            return;
        };
        if let Err(error) = document.set_cookie(directive) {
            tracing::warn!(?error, "Could not write cookie");
        }
    }
}

/// Timers, window listeners and tasks on the browser event loop
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHost;

impl GuardHost for BrowserHost {
    fn every(&self, period: Duration, callback: Box<dyn FnMut()>) -> Subscription {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        Subscription::new(Interval::new(millis, callback))
    }

    fn listen(&self, events: &[ActivityEvent], callback: Rc<dyn Fn()>) -> Subscription {
        let Some(window) = web_sys::window() else {
            return Subscription::new(());
        };

        let listeners: Vec<EventListener> = events
            .iter()
            .map(|event| {
                let callback = Rc::clone(&callback);
                EventListener::new(&window, event.dom_name(), move |_| callback())
            })
            .collect();
        Subscription::new(listeners)
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
