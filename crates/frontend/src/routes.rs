//! Console routes

use serde::Serialize;
use shloksagar_core::Redirect;
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/dashboard")]
    Dashboard,
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// Query carried by the login route after an inactivity logout
#[derive(Serialize)]
struct ExpiredQuery {
    expired: bool,
}

/// Navigate to the login view for `redirect`
pub fn follow(navigator: &Navigator, redirect: &Redirect) {
    tracing::debug!(reason = ?redirect.reason, location = %redirect.location(), "Redirecting");

    if redirect.is_expired() {
        if let Err(error) = navigator.replace_with_query(&Route::Login, &ExpiredQuery { expired: true }) {
            tracing::error!(?error, "Could not navigate to login");
            navigator.replace(&Route::Login);
        }
    } else {
        navigator.replace(&Route::Login);
    }
}
