//! Authentication endpoints of the REST API.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`.
//! Host builds: stubs returning `ApiError::Unavailable`, so the session store
//! can be exercised in tests against a scripted `AuthApi` instead.
//!
//! ERROR HANDLING
//! ==============
//! Non-success responses are mapped to `ApiError::Rejected` carrying the
//! server's message when the body has one. Callers decide on the fallback.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::config::ClientConfig;
use crate::error::ApiError;

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const REGISTER_ENDPOINT: &str = "/api/auth/register";

/// The authentication half of the REST API, as seen by the session store.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    /// Exchange credentials for a token and user via `POST /api/auth/login`.
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError>;

    /// Create an account via `POST /api/auth/register`.
    async fn register(&self, form: &RegisterRequest) -> Result<RegisterResponse, ApiError>;
}

/// `AuthApi` backed by the browser's fetch.
#[derive(Clone, Debug)]
pub struct HttpAuthApi {
    config: ClientConfig,
}

impl HttpAuthApi {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        #[cfg(feature = "csr")]
        {
            post_json(&self.config.endpoint(LOGIN_ENDPOINT), credentials).await
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&self.config, credentials);
            Err(ApiError::Unavailable)
        }
    }

    async fn register(&self, form: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        #[cfg(feature = "csr")]
        {
            post_json(&self.config.endpoint(REGISTER_ENDPOINT), form).await
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&self.config, form);
            Err(ApiError::Unavailable)
        }
    }
}

#[cfg(feature = "csr")]
async fn post_json<B, T>(url: &str, body: &B) -> Result<T, ApiError>
where
    B: serde::Serialize,
    T: serde::de::DeserializeOwned,
{
    let resp = gloo_net::http::Request::post(url)
        .json(body)
        .map_err(|e| ApiError::Decode(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    read_json(resp).await
}

/// Decode a JSON body, or turn a non-success status into `ApiError::Rejected`.
#[cfg(feature = "csr")]
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(resp: gloo_net::http::Response) -> Result<T, ApiError> {
    if !resp.ok() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(rejected(status, &body));
    }
    resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(any(test, feature = "csr"))]
pub(crate) fn rejected(status: u16, body: &str) -> ApiError {
    ApiError::Rejected { status, message: rejection_message(body).unwrap_or_default() }
}

/// Pull a human-readable message out of an error body.
///
/// The API reports failures as `{"msg": ...}`, `{"message": ...}` or a
/// validator list `{"errors": [{"msg": ...}]}`.
#[cfg(any(test, feature = "csr"))]
pub(crate) fn rejection_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = value
        .get("msg")
        .or_else(|| value.get("message"))
        .or_else(|| value.get("errors")?.get(0)?.get("msg"))?
        .as_str()?
        .trim();
    (!message.is_empty()).then(|| message.to_owned())
}
