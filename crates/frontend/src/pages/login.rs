//! Login view

use crate::auth::use_session;
use crate::components::LoadingSpinner;
use crate::routes::Route;
use crate::services::AuthApiService;
use shloksagar_core::login::EXPIRED_NOTICE;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let query = use_location()
        .map(|location| location.query_str().to_string())
        .unwrap_or_default();

    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| Option::<String>::None);
    let is_loading = use_state(|| false);
    let expired = use_state(|| false);

    // Whatever the tab still holds belongs to a finished session
    {
        let session = session.clone();
        let expired = expired.clone();
        use_effect_with((), move |_| {
            expired.set(session.login.enter(&query));
        });
    }

    let on_email_input = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_password_input = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let on_submit = {
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let is_loading = is_loading.clone();
        let expired = expired.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *is_loading {
                return;
            }

            let session = session.clone();
            let navigator = navigator.clone();
            let email = (*email).clone();
            let password = (*password).clone();
            let error = error.clone();
            let is_loading = is_loading.clone();
            expired.set(false);
            error.set(None);
            is_loading.set(true);

            spawn_local(async move {
                let service = AuthApiService::new(session.config());
                let result = match service.login(email, password).await {
                    Ok(response) => session
                        .login
                        .complete(&response)
                        .map_err(|e| e.to_string()),
                    Err(e) => Err(e.user_message()),
                };

                is_loading.set(false);
                match result {
                    Ok(next) => {
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::recognize(&next).unwrap_or(Route::Dashboard));
                        }
                    }
                    Err(message) => {
                        tracing::warn!(%message, "Login failed");
                        error.set(Some(message));
                    }
                }
            });
        })
    };

    html! {
        <div class="min-h-screen bg-gradient-to-br from-orange-50 to-amber-100 flex items-center justify-center px-4">
            <div class="max-w-md w-full">
                <div class="text-center mb-8">
                    <h1 class="text-3xl font-bold text-orange-700">{"ShlokSagar"}</h1>
                    <p class="mt-2 text-gray-600">{"Admin console"}</p>
                </div>
                <div class="bg-white rounded-lg shadow-lg p-8">
                    if *expired {
                        <div class="mb-4 p-3 rounded bg-amber-50 border border-amber-300 text-amber-800 text-sm">
                            {EXPIRED_NOTICE}
                        </div>
                    }
                    if let Some(message) = &*error {
                        <div class="mb-4 p-3 rounded bg-red-50 border border-red-300 text-red-700 text-sm">
                            {message}
                        </div>
                    }
                    if *is_loading {
                        <LoadingSpinner text={Some("Signing in...".to_string())} />
                    } else {
                        <form onsubmit={on_submit} class="space-y-4">
                            <div>
                                <label class="block text-sm font-medium text-gray-700" for="email">{"Email"}</label>
                                <input
                                    id="email"
                                    type="email"
                                    required=true
                                    value={(*email).clone()}
                                    oninput={on_email_input}
                                    class="mt-1 w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-orange-500"
                                />
                            </div>
                            <div>
                                <label class="block text-sm font-medium text-gray-700" for="password">{"Password"}</label>
                                <input
                                    id="password"
                                    type="password"
                                    required=true
                                    value={(*password).clone()}
                                    oninput={on_password_input}
                                    class="mt-1 w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-orange-500"
                                />
                            </div>
                            <button
                                type="submit"
                                class="w-full py-2 px-4 text-white font-medium bg-orange-600 hover:bg-orange-700 rounded-md transition-colors"
                            >
                                {"Sign In"}
                            </button>
                        </form>
                    }
                </div>
            </div>
        </div>
    }
}
