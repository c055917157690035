use crate::auth::SessionProvider;
use crate::components::RouteGate;
use crate::pages::{DashboardPage, LoginPage, NotFoundPage};
use crate::routes::Route;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <SessionProvider>
                <Switch<Route> render={switch} />
            </SessionProvider>
        </BrowserRouter>
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Login => html! { <LoginPage /> },
        Route::Home => html! {
            <RouteGate>
                <Redirect<Route> to={Route::Dashboard} />
            </RouteGate>
        },
        Route::Dashboard => html! {
            <RouteGate>
                <DashboardPage />
            </RouteGate>
        },
        Route::NotFound => html! {
            <RouteGate>
                <NotFoundPage />
            </RouteGate>
        },
    }
}
