//! Persisted credential cache (`token` + serialized `user`).
//!
//! SYSTEM CONTEXT
//! ==============
//! Read once at startup by `SessionStore::load_user`, written on login and
//! cleared on logout or failed resolution. The browser implementation lives in
//! `localStorage`; host builds and tests use the in-memory cache.
//!
//! TRADE-OFFS
//! ==========
//! Entries are stored in plain text with no expiry. Removal is the only way a
//! cached session ends.

#[cfg(test)]
#[path = "credentials_test.rs"]
mod credentials_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::CacheError;
use crate::net::types::User;

/// The two logical entries the session persists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    Token,
    User,
}

impl CredentialKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::User => "user",
        }
    }
}

/// Durable key-value storage for session credentials.
pub trait CredentialCache {
    fn get(&self, key: CredentialKey) -> Option<String>;

    /// # Errors
    ///
    /// Returns `CacheError` when the backing storage rejects the write.
    fn set(&self, key: CredentialKey, value: &str) -> Result<(), CacheError>;

    fn remove(&self, key: CredentialKey);
}

/// Read the cached token and user; `None` unless both exist and the user parses.
pub fn load_credentials(cache: &impl CredentialCache) -> Option<(String, User)> {
    let token = cache.get(CredentialKey::Token).filter(|t| !t.is_empty())?;
    let raw_user = cache.get(CredentialKey::User)?;
    match serde_json::from_str::<User>(&raw_user) {
        Ok(user) => Some((token, user)),
        Err(e) => {
            leptos::logging::warn!("cached user record unreadable: {e}");
            None
        }
    }
}

/// Persist a token and its user snapshot.
///
/// # Errors
///
/// Returns `CacheError` if either entry could not be written.
pub fn store_credentials(cache: &impl CredentialCache, token: &str, user: &User) -> Result<(), CacheError> {
    let raw_user = serde_json::to_string(user).map_err(|e| CacheError::Encode(e.to_string()))?;
    cache.set(CredentialKey::Token, token)?;
    cache.set(CredentialKey::User, &raw_user)
}

pub fn clear_credentials(cache: &impl CredentialCache) {
    cache.remove(CredentialKey::Token);
    cache.remove(CredentialKey::User);
}

/// Log a failed removal; returns whether the entry is gone.
#[cfg(any(test, feature = "csr"))]
fn report_removal<E: std::fmt::Debug>(key: CredentialKey, result: Result<(), E>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            leptos::logging::warn!("credential cache remove failed: key={} err={e:?}", key.as_str());
            false
        }
    }
}

/// `CredentialCache` over `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserCredentialCache;

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl CredentialCache for BrowserCredentialCache {
    fn get(&self, key: CredentialKey) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            local_storage()?.get_item(key.as_str()).ok().flatten()
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: CredentialKey, value: &str) -> Result<(), CacheError> {
        #[cfg(feature = "csr")]
        {
            let storage = local_storage().ok_or(CacheError::Unavailable)?;
            storage
                .set_item(key.as_str(), value)
                .map_err(|_| CacheError::Write { key: key.as_str() })
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
            Err(CacheError::Unavailable)
        }
    }

    fn remove(&self, key: CredentialKey) {
        #[cfg(feature = "csr")]
        {
            match local_storage() {
                Some(storage) => {
                    report_removal(key, storage.remove_item(key.as_str()));
                }
                None => leptos::logging::warn!("localStorage unavailable; {} not removed", key.as_str()),
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
        }
    }
}

/// In-memory `CredentialCache`. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentialCache {
    entries: Rc<RefCell<HashMap<CredentialKey, String>>>,
}

impl CredentialCache for MemoryCredentialCache {
    fn get(&self, key: CredentialKey) -> Option<String> {
        self.entries.borrow().get(&key).cloned()
    }

    fn set(&self, key: CredentialKey, value: &str) -> Result<(), CacheError> {
        self.entries.borrow_mut().insert(key, value.to_owned());
        Ok(())
    }

    fn remove(&self, key: CredentialKey) {
        self.entries.borrow_mut().remove(&key);
    }
}
