//! Navigation-time gate
//!
//! Checks only the cookie mirror, before the view renders. A present but
//! stale token still gets through; the view's session guard catches that.

use crate::auth::use_session;
use crate::routes::Route;
use shloksagar_core::RouteDecision;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct RouteGateProps {
    pub children: Children,
}

#[function_component(RouteGate)]
pub fn route_gate(props: &RouteGateProps) -> Html {
    let session = use_session();
    let path = use_location()
        .map(|location| location.path().to_string())
        .unwrap_or_default();

    match session.route_decision(&path) {
        RouteDecision::Allow => html! { <>{ props.children.clone() }</> },
        RouteDecision::Redirect(_) => html! { <Redirect<Route> to={Route::Login} /> },
    }
}
