//! Session context shared by every route

use crate::auth::unauthorized::{clear_unauthorized_handler, set_unauthorized_handler};
use crate::browser::{BrowserSessionStore, DocumentCookieJar};
use crate::config::session_config;
use crate::routes::follow;
use shloksagar_core::{
    ApiVerifier, Clock, CookieJar, CookieMirror, LoginFlow, RouteDecision, RouteGuard,
    SessionConfig, SessionGuard, SessionOutcome, Sessions, SystemClock,
};
use std::rc::Rc;
use yew::prelude::*;
use yew_router::prelude::*;

/// Everything a view needs to take part in the session lifecycle
#[derive(Clone)]
pub struct SessionHandle {
    pub guard: Rc<SessionGuard>,
    pub login: Rc<LoginFlow>,
    pub routes: Rc<RouteGuard>,
    cookies: Rc<DocumentCookieJar>,
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.guard, &other.guard)
    }
}

impl SessionHandle {
    pub fn new(config: &SessionConfig) -> Self {
        let store = Rc::new(BrowserSessionStore::new());
        let cookies = Rc::new(DocumentCookieJar::new());
        let sessions = Sessions::new(
            store,
            cookies.clone(),
            CookieMirror::new(config.cookie_name.clone()),
        );
        let clock: Rc<dyn Clock> = Rc::new(SystemClock);
        let verifier = Rc::new(ApiVerifier::new(config.api_url.clone()));

        Self {
            guard: Rc::new(SessionGuard::new(
                config.clone(),
                sessions.clone(),
                Rc::clone(&clock),
                verifier,
            )),
            login: Rc::new(LoginFlow::new(config.clone(), sessions, clock)),
            routes: Rc::new(RouteGuard::new(config)),
            cookies,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        self.guard.config()
    }

    /// Navigation-time check for `path` against the current cookies
    pub fn route_decision(&self, path: &str) -> RouteDecision {
        self.routes.check(path, &self.cookies.cookie_header())
    }
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub children: Children,
}

/// Provides the [`SessionHandle`] and signs the admin out when any API call
/// reports a rejected token
#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let session = use_memo((), |_| SessionHandle::new(&session_config()));
    let navigator = use_navigator();

    {
        let session = (*session).clone();
        use_effect_with((), move |_| {
            set_unauthorized_handler(Rc::new(move || {
                tracing::warn!("API rejected the admin token, signing out");
                let outcome = session.guard.logout();
                if let (SessionOutcome::RedirectTo(redirect), Some(navigator)) =
                    (outcome, &navigator)
                {
                    follow(navigator, &redirect);
                }
            }));

            move || clear_unauthorized_handler()
        });
    }

    html! {
        <ContextProvider<SessionHandle> context={(*session).clone()}>
            { props.children.clone() }
        </ContextProvider<SessionHandle>>
    }
}

#[hook]
pub fn use_session() -> SessionHandle {
    use_context::<SessionHandle>()
        .expect("SessionHandle not found. Make sure to wrap your component with SessionProvider")
}
