//! Session store: the single owner of the auth session.
//!
//! SYSTEM CONTEXT
//! ==============
//! Created once by `App`, handed to pages through context. It is the only
//! writer of `Session`; its side effects are limited to the credential cache
//! and the shared `RequestAuthorizer`.
//!
//! CONCURRENCY
//! ===========
//! Everything runs on the UI thread. `login` and `register` suspend only at the
//! HTTP call and never hold a borrow of the session across that await, so a
//! route-guard read during the call sees the previous state in full. An
//! in-flight login cannot be cancelled: if it resolves after `logout`, the
//! user ends up signed in again.
//!
//! Events raised while observers are being notified (an observer calling
//! `logout`, say) are queued and applied after the current round, so every
//! observer sees every snapshot in order and the last one it sees is the
//! store's state.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use super::credentials::{CredentialCache, clear_credentials, load_credentials, store_credentials};
use super::session::{Session, SessionEvent, SessionPhase, transition};
use crate::error::{ApiError, LOGIN_FAILED_FALLBACK};
use crate::net::api::AuthApi;
use crate::net::authorizer::RequestAuthorizer;
use crate::net::types::{LoginRequest, LoginResponse, RegisterRequest, User};

type Observer = Rc<dyn Fn(&Session)>;

struct StoreInner<C, A> {
    session: RefCell<Session>,
    cache: C,
    api: A,
    authorizer: RequestAuthorizer,
    observers: RefCell<Vec<Observer>>,
    queued: RefCell<VecDeque<SessionEvent>>,
    draining: Cell<bool>,
}

/// Cloneable handle to the session and the operations that change it.
pub struct SessionStore<C, A> {
    inner: Rc<StoreInner<C, A>>,
}

impl<C, A> Clone for SessionStore<C, A> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<C: CredentialCache, A: AuthApi> SessionStore<C, A> {
    /// Build a store in the `Resolving` state. Call [`SessionStore::load_user`]
    /// once to settle it.
    pub fn new(cache: C, api: A, authorizer: RequestAuthorizer) -> Self {
        authorizer.apply(None);
        Self {
            inner: Rc::new(StoreInner {
                session: RefCell::new(Session::resolving()),
                cache,
                api,
                authorizer,
                observers: RefCell::new(Vec::new()),
                queued: RefCell::new(VecDeque::new()),
                draining: Cell::new(false),
            }),
        }
    }

    /// A consistent copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.inner.session.borrow().clone()
    }

    /// Register a callback run with the current session now and after every
    /// transition.
    pub fn subscribe(&self, observer: impl Fn(&Session) + 'static) {
        observer(&self.snapshot());
        self.inner.observers.borrow_mut().push(Rc::new(observer));
    }

    /// Resolve the session from the credential cache.
    ///
    /// The cached identity is trusted as-is; the token is not re-validated
    /// against the server. Anything short of a token plus a readable user
    /// record clears the cache and settles anonymous.
    pub fn load_user(&self) -> SessionPhase {
        match load_credentials(&self.inner.cache) {
            Some((token, user)) => self.dispatch(SessionEvent::UserLoaded { token, user }),
            None => {
                clear_credentials(&self.inner.cache);
                self.dispatch(SessionEvent::ResolutionFailed);
            }
        }
        self.snapshot().phase()
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` from the auth endpoint, or `ApiError::Decode`
    /// when a successful response carries no user. Either way the session is
    /// anonymous afterwards and the cached credentials are gone.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<User, ApiError> {
        match self.inner.api.login(credentials).await {
            Ok(LoginResponse { token, user: Some(user) }) => {
                if let Err(e) = store_credentials(&self.inner.cache, &token, &user) {
                    leptos::logging::warn!("credential cache write failed: {e}");
                }
                leptos::logging::log!("login succeeded: user={}", user.id);
                self.dispatch(SessionEvent::LoginSucceeded { token, user: user.clone() });
                Ok(user)
            }
            Ok(LoginResponse { user: None, .. }) => {
                let err = ApiError::Decode("login response missing user".to_owned());
                self.fail_login(&err);
                Err(err)
            }
            Err(err) => {
                self.fail_login(&err);
                Err(err)
            }
        }
    }

    /// Sign out. Safe to call in any state.
    pub fn logout(&self) {
        clear_credentials(&self.inner.cache);
        self.dispatch(SessionEvent::LoggedOut);
    }

    /// Create an account. The new user is not signed in; they log in next.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` from the register endpoint.
    pub async fn register(&self, form: &RegisterRequest) -> Result<(), ApiError> {
        match self.inner.api.register(form).await {
            Ok(_) => {
                leptos::logging::log!("registration accepted: role={}", form.role.as_str());
                Ok(())
            }
            Err(err) => {
                leptos::logging::warn!("registration failed: {err}");
                Err(err)
            }
        }
    }

    fn fail_login(&self, err: &ApiError) {
        leptos::logging::warn!("login failed: {err}");
        clear_credentials(&self.inner.cache);
        self.dispatch(SessionEvent::LoginFailed { message: err.user_message(LOGIN_FAILED_FALLBACK) });
    }

    fn dispatch(&self, event: SessionEvent) {
        self.inner.queued.borrow_mut().push_back(event);
        if self.inner.draining.replace(true) {
            return;
        }
        while let Some(event) = self.next_queued() {
            let next = transition(self.snapshot(), event);
            self.inner.authorizer.apply(next.token.as_deref());
            *self.inner.session.borrow_mut() = next.clone();
            let observers: Vec<Observer> = self.inner.observers.borrow().clone();
            for observer in &observers {
                observer(&next);
            }
        }
        self.inner.draining.set(false);
    }

    fn next_queued(&self) -> Option<SessionEvent> {
        self.inner.queued.borrow_mut().pop_front()
    }
}
