//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds the single session store, resolves it from the credential
//! cache before the first render, and mirrors every transition into a
//! `RwSignal<Session>` that guards and views read.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::navbar::Navbar;
use crate::components::route_guard::{GuestRoute, PrivateRoute};
use crate::config::ClientConfig;
use crate::net::api::HttpAuthApi;
use crate::net::authorizer::RequestAuthorizer;
use crate::net::rest::ApiClient;
use crate::pages::{dashboard::DashboardPage, login::LoginPage, register::RegisterPage};
use crate::state::credentials::BrowserCredentialCache;
use crate::state::store::SessionStore;

pub type AppSessionStore = SessionStore<BrowserCredentialCache, HttpAuthApi>;

/// Context handle to the session store. The store is `Rc`-based, so it lives
/// in local storage and is cloned out per use.
pub type SessionHandle = StoredValue<AppSessionStore, LocalStorage>;

/// Context handle to the authorized REST client.
pub type ApiHandle = StoredValue<ApiClient, LocalStorage>;

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_env();
    let authorizer = RequestAuthorizer::default();
    let store: AppSessionStore =
        SessionStore::new(BrowserCredentialCache, HttpAuthApi::new(config.clone()), authorizer.clone());

    let session = RwSignal::new(store.snapshot());
    store.subscribe(move |next| session.set(next.clone()));
    store.load_user();

    provide_context(session);
    provide_context::<SessionHandle>(StoredValue::new_local(store));
    provide_context::<ApiHandle>(StoredValue::new_local(ApiClient::new(config, authorizer)));

    view! {
        <Title text="Mess Manager"/>

        <Router>
            <Navbar/>
            <main class="container">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route
                        path=StaticSegment("login")
                        view=|| view! { <GuestRoute><LoginPage/></GuestRoute> }
                    />
                    <Route
                        path=StaticSegment("register")
                        view=|| view! { <GuestRoute><RegisterPage/></GuestRoute> }
                    />
                    <Route
                        path=StaticSegment("")
                        view=|| view! { <PrivateRoute><DashboardPage/></PrivateRoute> }
                    />
                </Routes>
            </main>
        </Router>
    }
}
