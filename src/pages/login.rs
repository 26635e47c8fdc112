//! Login page: email + password against `POST /api/auth/login`.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_query_map;

use crate::app::SessionHandle;
use crate::net::types::LoginRequest;
use crate::state::session::Session;

pub(crate) const FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub(crate) const REGISTERED_NOTICE: &str = "Registration successful! Please login.";

/// Query flag set by the register page after a successful sign-up.
pub(crate) const REGISTERED_QUERY_KEY: &str = "registered";

fn validate_login_input(email: &str, password: &str) -> Result<LoginRequest, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(FILL_ALL_FIELDS);
    }
    Ok(LoginRequest { email: email.to_owned(), password: password.to_owned() })
}

/// Form-local text (validation, registration notice) wins over the session's
/// last login error.
fn login_message(local: &str, session_error: Option<&str>) -> Option<String> {
    if local.is_empty() { session_error.filter(|e| !e.is_empty()).map(str::to_owned) } else { Some(local.to_owned()) }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let store = expect_context::<SessionHandle>();
    let session = expect_context::<RwSignal<Session>>();
    let query = use_query_map();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    if query.get_untracked().get(REGISTERED_QUERY_KEY).is_some() {
        info.set(REGISTERED_NOTICE.to_owned());
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let credentials = match validate_login_input(&email.get(), &password.get()) {
            Ok(credentials) => credentials,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set(String::new());

        let handle = store.get_value();
        leptos::task::spawn_local(async move {
            // On success the guest guard redirects home; a failure lands in
            // `session.error`.
            let _ = handle.login(&credentials).await;
            busy.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit>
                <h2>"Login"</h2>
                <label for="email">"Email"</label>
                <input
                    id="email"
                    class="auth-input"
                    type="email"
                    placeholder="Email"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <label for="password">"Password"</label>
                <input
                    id="password"
                    class="auth-input"
                    type="password"
                    placeholder="******************"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <button class="auth-button" type="submit" disabled=move || busy.get()>
                    "Sign In"
                </button>
                {move || {
                    login_message(&info.get(), session.get().error.as_deref())
                        .map(|message| view! { <p class="auth-message">{message}</p> })
                }}
                <p class="auth-switch">
                    "Don't have an account? " <A href="/register">"Register"</A>
                </p>
            </form>
        </div>
    }
}
