//! Registration page: name, email, password and household role.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use super::login::{FILL_ALL_FIELDS, REGISTERED_QUERY_KEY};
use crate::app::SessionHandle;
use crate::error::REGISTER_FAILED_FALLBACK;
use crate::net::types::{RegisterRequest, Role};

fn validate_register_input(name: &str, email: &str, password: &str, role: &str) -> Result<RegisterRequest, &'static str> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(FILL_ALL_FIELDS);
    }
    Ok(RegisterRequest {
        name: name.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
        role: Role::from_form_value(role),
    })
}

fn login_after_register_path() -> String {
    format!("/login?{REGISTERED_QUERY_KEY}=1")
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let store = expect_context::<SessionHandle>();
    let navigate = use_navigate();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let role = RwSignal::new(Role::Member.as_str().to_owned());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = match validate_register_input(&name.get(), &email.get(), &password.get(), &role.get()) {
            Ok(form) => form,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set(String::new());

        let handle = store.get_value();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match handle.register(&form).await {
                Ok(()) => navigate(&login_after_register_path(), NavigateOptions::default()),
                Err(e) => {
                    info.set(e.user_message(REGISTER_FAILED_FALLBACK));
                    busy.set(false);
                }
            }
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-card auth-card--wide" on:submit=on_submit>
                <h2>"Register"</h2>
                <label for="name">"Name"</label>
                <input
                    id="name"
                    class="auth-input"
                    type="text"
                    placeholder="Full Name"
                    prop:value=move || name.get()
                    on:input=move |ev| name.set(event_target_value(&ev))
                />
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
                <label for="role">"Role"</label>
                <select
                    id="role"
                    class="auth-input"
                    prop:value=move || role.get()
                    on:change=move |ev| role.set(event_target_value(&ev))
                >
                    <option value="member">"Member"</option>
                    <option value="admin">"Admin"</option>
                </select>
                <button class="auth-button" type="submit" disabled=move || busy.get()>
                    "Register"
                </button>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <p class="auth-switch">
                    "Already have an account? " <A href="/login">"Login"</A>
                </p>
            </form>
        </div>
    }
}
