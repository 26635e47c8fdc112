//! Route-guard decisions shared by protected and guest-only routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components must apply identical redirect behavior. Both decisions
//! return `Pending` while the session is still resolving so a page reload
//! never flashes a redirect before the cached session has been read.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::state::session::Session;

/// Outcome for a route that requires a signed-in user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    Pending,
}

/// Outcome for a route only meant for signed-out users (login, register).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuestDecision {
    Allow,
    RedirectHome,
    Pending,
}

pub fn can_enter(session: &Session) -> GuardDecision {
    if session.loading {
        GuardDecision::Pending
    } else if session.is_authenticated() {
        GuardDecision::Allow
    } else {
        GuardDecision::RedirectToLogin
    }
}

pub fn guest_decision(session: &Session) -> GuestDecision {
    if session.loading {
        GuestDecision::Pending
    } else if session.is_authenticated() {
        GuestDecision::RedirectHome
    } else {
        GuestDecision::Allow
    }
}
