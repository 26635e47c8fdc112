//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the route guard, the navbar and the dashboards; written only by
//! `SessionStore` through [`transition`].
//!
//! DESIGN
//! ======
//! The session is a plain value and every change is a `(Session, SessionEvent)
//! -> Session` step, so the whole lifecycle is testable without storage or
//! network. Invariant: `is_authenticated == Some(true)` implies both `token`
//! and `user` are present, which the event payloads enforce by construction.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::User;

/// The client's current belief about who is logged in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    /// `None` until the first resolution completes.
    pub is_authenticated: Option<bool>,
    /// True only before the first resolution completes.
    pub loading: bool,
    pub user: Option<User>,
    /// Message from the last failed login, for display.
    pub error: Option<String>,
}

/// Coarse lifecycle position derived from a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Resolving,
    Authenticated,
    Anonymous,
}

/// Everything that can move the session from one state to another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Startup resolution found a cached token and user.
    UserLoaded { token: String, user: User },
    /// Startup resolution found nothing usable in the cache.
    ResolutionFailed,
    LoginSucceeded { token: String, user: User },
    LoginFailed { message: String },
    LoggedOut,
}

impl Session {
    /// Initial state at application load.
    pub fn resolving() -> Self {
        Self { token: None, is_authenticated: None, loading: true, user: None, error: None }
    }

    pub fn anonymous() -> Self {
        Self { token: None, is_authenticated: Some(false), loading: false, user: None, error: None }
    }

    fn authenticated(token: String, user: User) -> Self {
        Self { token: Some(token), is_authenticated: Some(true), loading: false, user: Some(user), error: None }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Resolving
        } else if self.is_authenticated() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated == Some(true) && self.token.is_some() && self.user.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::resolving()
    }
}

/// Apply one event to the session.
///
/// Every event settles resolution, so `loading` is false in every result.
pub fn transition(state: Session, event: SessionEvent) -> Session {
    match event {
        SessionEvent::UserLoaded { token, user } | SessionEvent::LoginSucceeded { token, user } => {
            Session::authenticated(token, user)
        }
        SessionEvent::LoginFailed { message } => Session { error: Some(message), ..Session::anonymous() },
        SessionEvent::ResolutionFailed | SessionEvent::LoggedOut => {
            if state.phase() == SessionPhase::Anonymous && state.error.is_none() {
                state
            } else {
                Session::anonymous()
            }
        }
    }
}
