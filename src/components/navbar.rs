//! Top navigation bar with session-aware links.

#[cfg(test)]
#[path = "navbar_test.rs"]
mod navbar_test;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::app::SessionHandle;
use crate::net::types::User;
use crate::state::session::Session;

fn greeting(user: Option<&User>) -> String {
    match user {
        Some(user) => format!("Hello, {}", user.name),
        None => "Hello".to_owned(),
    }
}

#[component]
pub fn Navbar() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let store = expect_context::<SessionHandle>();

    let on_logout = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        store.get_value().logout();
    };

    view! {
        <nav class="navbar">
            <A href="/" attr:class="navbar__brand">"Mess Manager"</A>
            <Show
                when=move || session.get().is_authenticated()
                fallback=|| {
                    view! {
                        <ul class="navbar__links">
                            <li>
                                <A href="/login">"Login"</A>
                            </li>
                        </ul>
                    }
                }
            >
                <ul class="navbar__links">
                    <li>
                        <span class="navbar__greeting">{move || greeting(session.get().user.as_ref())}</span>
                    </li>
                    <li>
                        <a href="#" on:click=on_logout>
                            "Logout"
                        </a>
                    </li>
                </ul>
            </Show>
        </nav>
    }
}
