//! Route wrappers that render a guard decision.
//!
//! The decision is memoized so children are rebuilt only when the outcome
//! changes, not on every session update.

use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::state::session::Session;
use crate::util::guard::{GuardDecision, GuestDecision, can_enter, guest_decision};

/// Render children only for a signed-in user; otherwise send them to `/login`.
#[component]
pub fn PrivateRoute(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let decision = Memo::new(move |_| can_enter(&session.get()));

    move || match decision.get() {
        GuardDecision::Pending => view! { <div class="route-pending">"Loading..."</div> }.into_any(),
        GuardDecision::Allow => children().into_any(),
        GuardDecision::RedirectToLogin => view! { <Redirect path="/login"/> }.into_any(),
    }
}

/// Render children only for a signed-out user; otherwise send them home.
#[component]
pub fn GuestRoute(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let decision = Memo::new(move |_| guest_decision(&session.get()));

    move || match decision.get() {
        GuestDecision::Pending => view! { <div class="route-pending">"Loading..."</div> }.into_any(),
        GuestDecision::Allow => children().into_any(),
        GuestDecision::RedirectHome => view! { <Redirect path="/"/> }.into_any(),
    }
}
