//! Session guard hook for protected views

use crate::auth::use_session;
use crate::browser::BrowserHost;
use crate::routes::follow;
use shloksagar_core::{Mount, Redirect, SessionOutcome};
use std::rc::Rc;
use yew::prelude::*;
use yew_router::prelude::*;

/// Guard the calling view for as long as it is mounted.
///
/// The guard restarts whenever the route path changes; leaving the view
/// releases its timer and listeners. Returns the logout action.
#[hook]
pub fn use_session_guard() -> Callback<()> {
    let session = use_session();
    let navigator = use_navigator();
    let path = use_location()
        .map(|location| location.path().to_string())
        .unwrap_or_default();

    {
        let session = session.clone();
        let navigator = navigator.clone();
        use_effect_with(path, move |path| {
            let on_redirect: Rc<dyn Fn(Redirect)> = Rc::new(move |redirect: Redirect| {
                if let Some(navigator) = &navigator {
                    follow(navigator, &redirect);
                }
            });

            let active = match session.guard.start(path, &BrowserHost, Rc::clone(&on_redirect)) {
                Mount::Active(active) => Some(active),
                Mount::Redirected(redirect) => {
                    on_redirect(redirect);
                    None
                }
                Mount::Bypassed => None,
            };

            move || drop(active)
        });
    }

    Callback::from(move |()| {
        if let (SessionOutcome::RedirectTo(redirect), Some(navigator)) =
            (session.guard.logout(), &navigator)
        {
            follow(navigator, &redirect);
        }
    })
}
