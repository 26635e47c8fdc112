//! Shared `x-auth-token` header state for outgoing API requests.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store re-applies the token on every transition; the REST
//! client reads it when building each request. Both hold clones of the same
//! handle, so a login or logout is visible to the very next request.

#[cfg(test)]
#[path = "authorizer_test.rs"]
mod authorizer_test;

use std::cell::RefCell;
use std::rc::Rc;

/// Header carrying the session token on authenticated requests.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Cloneable handle to the current request token.
#[derive(Clone, Debug, Default)]
pub struct RequestAuthorizer {
    token: Rc<RefCell<Option<String>>>,
}

impl RequestAuthorizer {
    /// Set or clear the token used for subsequent requests.
    ///
    /// An empty token is treated as absent so the header is never sent blank.
    pub fn apply(&self, token: Option<&str>) {
        *self.token.borrow_mut() = token.filter(|t| !t.is_empty()).map(str::to_owned);
    }

    /// Header name/value pair to attach, or `None` when signed out.
    pub fn header(&self) -> Option<(&'static str, String)> {
        self.token.borrow().clone().map(|token| (AUTH_HEADER, token))
    }

    pub fn is_set(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// Attach the header to a request under construction.
    #[cfg(feature = "csr")]
    pub fn authorize(&self, builder: gloo_net::http::RequestBuilder) -> gloo_net::http::RequestBuilder {
        match self.header() {
            Some((name, value)) => builder.header(name, &value),
            None => builder,
        }
    }
}
