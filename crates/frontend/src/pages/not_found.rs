use crate::hooks::use_session_guard;
use crate::routes::Route;
use yew::prelude::*;
use yew_router::prelude::*;

/// Unknown paths are protected like any other non-login view
#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
    let _logout = use_session_guard();

    html! {
        <div class="min-h-screen flex flex-col items-center justify-center bg-orange-50">
            <h1 class="text-4xl font-bold text-gray-800">{"404"}</h1>
            <p class="mt-2 text-gray-600">{"This page does not exist."}</p>
            <Link<Route> to={Route::Dashboard} classes="mt-6 text-orange-600 hover:underline">
                {"Back to dashboard"}
            </Link<Route>>
        </div>
    }
}
