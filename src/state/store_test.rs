use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::executor::block_on;

use super::*;
use crate::error::CacheError;
use crate::net::api::AuthApi;
use crate::net::authorizer::AUTH_HEADER;
use crate::net::types::{RegisterResponse, Role};
use crate::state::credentials::{CredentialKey, MemoryCredentialCache};

// =============================================================
// Fakes
// =============================================================

#[derive(Default)]
struct ScriptedAuthApi {
    logins: RefCell<VecDeque<Result<LoginResponse, ApiError>>>,
    registers: RefCell<VecDeque<Result<RegisterResponse, ApiError>>>,
    calls: Cell<usize>,
}

impl ScriptedAuthApi {
    fn with_login(result: Result<LoginResponse, ApiError>) -> Self {
        let api = Self::default();
        api.logins.borrow_mut().push_back(result);
        api
    }

    fn with_register(result: Result<RegisterResponse, ApiError>) -> Self {
        let api = Self::default();
        api.registers.borrow_mut().push_back(result);
        api
    }
}

impl AuthApi for ScriptedAuthApi {
    async fn login(&self, _credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.calls.set(self.calls.get() + 1);
        self.logins.borrow_mut().pop_front().unwrap_or(Err(ApiError::Unavailable))
    }

    async fn register(&self, _form: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.calls.set(self.calls.get() + 1);
        self.registers.borrow_mut().pop_front().unwrap_or(Err(ApiError::Unavailable))
    }
}

/// Login answers only once the test sends a response.
struct GatedAuthApi {
    pending: RefCell<Option<oneshot::Receiver<Result<LoginResponse, ApiError>>>>,
}

impl AuthApi for GatedAuthApi {
    async fn login(&self, _credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let rx = self.pending.borrow_mut().take().expect("single login per test");
        rx.await.expect("response sender dropped")
    }

    async fn register(&self, _form: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        Err(ApiError::Unavailable)
    }
}

/// Cache whose writes always fail.
#[derive(Default)]
struct ReadOnlyCache;

impl CredentialCache for ReadOnlyCache {
    fn get(&self, _key: CredentialKey) -> Option<String> {
        None
    }

    fn set(&self, key: CredentialKey, _value: &str) -> Result<(), CacheError> {
        Err(CacheError::Write { key: key.as_str() })
    }

    fn remove(&self, _key: CredentialKey) {}
}

fn member() -> User {
    User { id: "1".to_owned(), name: "A".to_owned(), email: None, role: Role::Member }
}

fn credentials() -> LoginRequest {
    LoginRequest { email: "a@b.com".to_owned(), password: "x".to_owned() }
}

fn t1_response() -> LoginResponse {
    LoginResponse { token: "T1".to_owned(), user: Some(member()) }
}

fn rejected(message: &str) -> ApiError {
    ApiError::Rejected { status: 400, message: message.to_owned() }
}

fn store_with(
    api: ScriptedAuthApi,
) -> (SessionStore<MemoryCredentialCache, ScriptedAuthApi>, MemoryCredentialCache, RequestAuthorizer) {
    let cache = MemoryCredentialCache::default();
    let authorizer = RequestAuthorizer::default();
    let store = SessionStore::new(cache.clone(), api, authorizer.clone());
    (store, cache, authorizer)
}

// =============================================================
// load_user
// =============================================================

#[test]
fn new_store_is_resolving() {
    let (store, _, authorizer) = store_with(ScriptedAuthApi::default());
    assert_eq!(store.snapshot().phase(), SessionPhase::Resolving);
    assert!(!authorizer.is_set());
}

#[test]
fn load_user_with_cached_credentials_authenticates() {
    let (store, cache, authorizer) = store_with(ScriptedAuthApi::default());
    store_credentials(&cache, "T1", &member()).unwrap();

    assert_eq!(store.load_user(), SessionPhase::Authenticated);
    let session = store.snapshot();
    assert_eq!(session.token.as_deref(), Some("T1"));
    assert_eq!(session.user, Some(member()));
    assert!(!session.loading);
    assert_eq!(authorizer.header(), Some((AUTH_HEADER, "T1".to_owned())));
}

#[test]
fn load_user_never_calls_the_network() {
    let (store, cache, _) = store_with(ScriptedAuthApi::default());
    store_credentials(&cache, "T1", &member()).unwrap();
    store.load_user();
    assert_eq!(store.inner.api.calls.get(), 0);
}

#[test]
fn load_user_with_empty_cache_is_anonymous() {
    let (store, _, authorizer) = store_with(ScriptedAuthApi::default());
    assert_eq!(store.load_user(), SessionPhase::Anonymous);
    assert_eq!(store.snapshot(), Session::anonymous());
    assert!(!authorizer.is_set());
}

#[test]
fn load_user_with_token_but_no_user_is_anonymous_and_clears_token() {
    let (store, cache, authorizer) = store_with(ScriptedAuthApi::default());
    cache.set(CredentialKey::Token, "T1").unwrap();

    assert_eq!(store.load_user(), SessionPhase::Anonymous);
    assert_eq!(store.snapshot().token, None);
    assert_eq!(cache.get(CredentialKey::Token), None);
    assert!(!authorizer.is_set());
}

#[test]
fn load_user_with_user_but_no_token_is_anonymous() {
    let (store, cache, _) = store_with(ScriptedAuthApi::default());
    cache.set(CredentialKey::User, &serde_json::to_string(&member()).unwrap()).unwrap();

    assert_eq!(store.load_user(), SessionPhase::Anonymous);
    assert_eq!(store.snapshot().user, None);
}

#[test]
fn load_user_with_corrupt_user_is_anonymous() {
    let (store, cache, _) = store_with(ScriptedAuthApi::default());
    cache.set(CredentialKey::Token, "T1").unwrap();
    cache.set(CredentialKey::User, "undefined").unwrap();

    assert_eq!(store.load_user(), SessionPhase::Anonymous);
    assert!(!store.snapshot().is_authenticated());
}

#[test]
fn load_user_is_idempotent() {
    let (store, cache, _) = store_with(ScriptedAuthApi::default());
    store_credentials(&cache, "T1", &member()).unwrap();

    store.load_user();
    let first = store.snapshot();
    store.load_user();
    assert_eq!(store.snapshot(), first);

    let (empty, _, _) = store_with(ScriptedAuthApi::default());
    empty.load_user();
    let first = empty.snapshot();
    empty.load_user();
    assert_eq!(empty.snapshot(), first);
}

// =============================================================
// login
// =============================================================

#[test]
fn login_success_persists_and_authorizes() {
    let (store, cache, authorizer) = store_with(ScriptedAuthApi::with_login(Ok(t1_response())));
    store.load_user();

    let user = block_on(store.login(&credentials())).unwrap();
    assert_eq!(user, member());
    assert!(store.snapshot().is_authenticated());
    assert_eq!(authorizer.header(), Some(("x-auth-token", "T1".to_owned())));
    assert_eq!(cache.get(CredentialKey::Token).as_deref(), Some("T1"));
    assert_eq!(
        cache.get(CredentialKey::User).as_deref(),
        Some(r#"{"id":"1","name":"A","role":"member"}"#)
    );
}

#[test]
fn login_survives_reload() {
    let (store, cache, _) = store_with(ScriptedAuthApi::with_login(Ok(t1_response())));
    store.load_user();
    block_on(store.login(&credentials())).unwrap();

    let reloaded = SessionStore::new(cache.clone(), ScriptedAuthApi::default(), RequestAuthorizer::default());
    assert_eq!(reloaded.load_user(), SessionPhase::Authenticated);
    assert_eq!(reloaded.snapshot().user, Some(member()));
}

#[test]
fn login_rejection_is_anonymous_with_server_message() {
    let (store, _, authorizer) = store_with(ScriptedAuthApi::with_login(Err(rejected("Invalid Credentials"))));
    store.load_user();

    let err = block_on(store.login(&credentials())).unwrap_err();
    assert_eq!(err, rejected("Invalid Credentials"));
    let session = store.snapshot();
    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert_eq!(session.error.as_deref(), Some("Invalid Credentials"));
    assert!(!authorizer.is_set());
}

#[test]
fn login_network_failure_uses_generic_message() {
    let (store, _, _) = store_with(ScriptedAuthApi::with_login(Err(ApiError::Network("offline".to_owned()))));
    store.load_user();

    assert!(block_on(store.login(&credentials())).is_err());
    assert_eq!(store.snapshot().error.as_deref(), Some(LOGIN_FAILED_FALLBACK));
}

#[test]
fn failed_login_removes_previously_cached_token() {
    let (store, cache, authorizer) = store_with(ScriptedAuthApi::with_login(Err(rejected("Invalid Credentials"))));
    store_credentials(&cache, "T0", &member()).unwrap();
    store.load_user();
    assert!(authorizer.is_set());

    assert!(block_on(store.login(&credentials())).is_err());
    assert_eq!(cache.get(CredentialKey::Token), None);
    assert_eq!(store.snapshot().phase(), SessionPhase::Anonymous);
    assert!(!authorizer.is_set());
}

#[test]
fn login_does_not_retry() {
    let (store, _, _) = store_with(ScriptedAuthApi::with_login(Err(rejected("nope"))));
    assert!(block_on(store.login(&credentials())).is_err());
    assert_eq!(store.inner.api.calls.get(), 1);
}

#[test]
fn login_response_without_user_is_treated_as_failure() {
    let response = LoginResponse { token: "T1".to_owned(), user: None };
    let (store, cache, authorizer) = store_with(ScriptedAuthApi::with_login(Ok(response)));

    let err = block_on(store.login(&credentials())).unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert_eq!(store.snapshot().phase(), SessionPhase::Anonymous);
    assert_eq!(cache.get(CredentialKey::Token), None);
    assert!(!authorizer.is_set());
}

#[test]
fn login_still_authenticates_when_cache_write_fails() {
    let authorizer = RequestAuthorizer::default();
    let store = SessionStore::new(ReadOnlyCache, ScriptedAuthApi::with_login(Ok(t1_response())), authorizer.clone());
    store.load_user();

    block_on(store.login(&credentials())).unwrap();
    assert!(store.snapshot().is_authenticated());
    assert!(authorizer.is_set());
}

#[test]
fn session_is_unchanged_while_login_is_in_flight() {
    let (tx, rx) = oneshot::channel();
    let authorizer = RequestAuthorizer::default();
    let store = SessionStore::new(
        MemoryCredentialCache::default(),
        GatedAuthApi { pending: RefCell::new(Some(rx)) },
        authorizer.clone(),
    );
    store.load_user();
    let before = store.snapshot();

    let request = credentials();
    let mut login = Box::pin(store.login(&request));
    assert!((&mut login).now_or_never().is_none());
    assert_eq!(store.snapshot(), before);
    assert!(!authorizer.is_set());

    tx.send(Ok(t1_response())).unwrap();
    block_on(login).unwrap();
    assert!(store.snapshot().is_authenticated());
}

#[test]
fn login_resolving_after_logout_signs_back_in() {
    let (tx, rx) = oneshot::channel();
    let cache = MemoryCredentialCache::default();
    let authorizer = RequestAuthorizer::default();
    let store = SessionStore::new(cache.clone(), GatedAuthApi { pending: RefCell::new(Some(rx)) }, authorizer.clone());
    store.load_user();

    let request = credentials();
    let mut login = Box::pin(store.login(&request));
    assert!((&mut login).now_or_never().is_none());
    store.logout();
    assert_eq!(store.snapshot().phase(), SessionPhase::Anonymous);

    tx.send(Ok(t1_response())).unwrap();
    block_on(login).unwrap();
    assert_eq!(store.snapshot().phase(), SessionPhase::Authenticated);
    assert_eq!(cache.get(CredentialKey::Token).as_deref(), Some("T1"));
    assert_eq!(authorizer.header(), Some((AUTH_HEADER, "T1".to_owned())));
}

// =============================================================
// logout
// =============================================================

#[test]
fn login_then_logout_ends_anonymous() {
    let (store, cache, authorizer) = store_with(ScriptedAuthApi::with_login(Ok(t1_response())));
    store.load_user();
    block_on(store.login(&credentials())).unwrap();

    store.logout();
    let session = store.snapshot();
    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert_eq!(session.token, None);
    assert_eq!(session.user, None);
    assert_eq!(cache.get(CredentialKey::Token), None);
    assert!(!authorizer.is_set());
}

#[test]
fn logout_then_reload_does_not_resurrect_session() {
    let (store, cache, _) = store_with(ScriptedAuthApi::with_login(Ok(t1_response())));
    store.load_user();
    block_on(store.login(&credentials())).unwrap();
    store.logout();

    let reloaded = SessionStore::new(cache.clone(), ScriptedAuthApi::default(), RequestAuthorizer::default());
    assert_eq!(reloaded.load_user(), SessionPhase::Anonymous);
}

#[test]
fn logout_is_idempotent() {
    let (store, _, _) = store_with(ScriptedAuthApi::default());
    store.logout();
    let once = store.snapshot();
    store.logout();
    assert_eq!(store.snapshot(), once);
    assert_eq!(once, Session::anonymous());
}

#[test]
fn logout_while_resolving_settles_anonymous() {
    let (store, _, _) = store_with(ScriptedAuthApi::default());
    store.logout();
    assert!(!store.snapshot().loading);
}

// =============================================================
// register
// =============================================================

fn registration() -> RegisterRequest {
    RegisterRequest {
        name: "A".to_owned(),
        email: "a@b.com".to_owned(),
        password: "x".to_owned(),
        role: Role::Member,
    }
}

#[test]
fn register_success_does_not_sign_in() {
    let api = ScriptedAuthApi::with_register(Ok(RegisterResponse { token: "R1".to_owned() }));
    let (store, cache, authorizer) = store_with(api);
    store.load_user();

    block_on(store.register(&registration())).unwrap();
    assert_eq!(store.snapshot().phase(), SessionPhase::Anonymous);
    assert_eq!(cache.get(CredentialKey::Token), None);
    assert!(!authorizer.is_set());
}

#[test]
fn register_failure_surfaces_error_and_keeps_session() {
    let (store, cache, _) = store_with(ScriptedAuthApi::with_register(Err(rejected("User already exists"))));
    store_credentials(&cache, "T1", &member()).unwrap();
    store.load_user();

    let err = block_on(store.register(&registration())).unwrap_err();
    assert_eq!(err.user_message("Registration failed"), "User already exists");
    assert!(store.snapshot().is_authenticated());
}

// =============================================================
// subscribe
// =============================================================

#[test]
fn subscribers_see_every_transition() {
    let (store, _, _) = store_with(ScriptedAuthApi::with_login(Ok(t1_response())));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |session| sink.borrow_mut().push(session.phase()));

    store.load_user();
    block_on(store.login(&credentials())).unwrap();
    store.logout();

    assert_eq!(
        *seen.borrow(),
        vec![
            SessionPhase::Resolving,
            SessionPhase::Anonymous,
            SessionPhase::Authenticated,
            SessionPhase::Anonymous,
        ]
    );
}

#[test]
fn observer_triggered_logout_reaches_later_observers_last() {
    let (store, cache, authorizer) = store_with(ScriptedAuthApi::with_login(Ok(t1_response())));

    let handle = store.clone();
    store.subscribe(move |session| {
        if session.is_authenticated() {
            handle.logout();
        }
    });
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |session| sink.borrow_mut().push(session.phase()));

    store.load_user();
    block_on(store.login(&credentials())).unwrap();

    assert_eq!(store.snapshot().phase(), SessionPhase::Anonymous);
    assert_eq!(
        *seen.borrow(),
        vec![
            SessionPhase::Resolving,
            SessionPhase::Anonymous,
            SessionPhase::Authenticated,
            SessionPhase::Anonymous,
        ]
    );
    assert_eq!(cache.get(CredentialKey::Token), None);
    assert!(!authorizer.is_set());
}

#[test]
fn observer_may_subscribe_during_notification() {
    let (store, _, _) = store_with(ScriptedAuthApi::default());
    let late = Rc::new(RefCell::new(Vec::new()));

    let handle = store.clone();
    let sink = Rc::clone(&late);
    let added = Cell::new(false);
    store.subscribe(move |session| {
        if !session.loading && !added.replace(true) {
            let sink = Rc::clone(&sink);
            handle.subscribe(move |s| sink.borrow_mut().push(s.phase()));
        }
    });

    store.load_user();
    store.logout();
    assert_eq!(*late.borrow(), vec![SessionPhase::Anonymous, SessionPhase::Anonymous]);
}
