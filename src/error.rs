//! Error types shared by the session core and the REST client.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal. Every failure is reported as a value so the session
//! store can fall back to the anonymous state and the view can show a message.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Generic message shown when a login fails without a server explanation.
pub const LOGIN_FAILED_FALLBACK: &str = "Login failed";

/// Generic message shown when registration fails without a server explanation.
pub const REGISTER_FAILED_FALLBACK: &str = "Registration failed";

/// Errors produced by HTTP calls against the REST API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (offline, CORS, DNS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The response body did not match the expected schema.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// HTTP is only wired up in the browser build.
    #[error("not available outside the browser")]
    Unavailable,
}

impl ApiError {
    /// Message suitable for display, falling back to `fallback` when the
    /// server did not explain the failure.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_owned(),
        }
    }
}

/// Errors produced by the persisted credential cache.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// `localStorage` could not be reached (private mode, quota, no window).
    #[error("credential storage unavailable")]
    Unavailable,

    /// A write to the backing storage failed.
    #[error("failed to write credential entry {key}")]
    Write { key: &'static str },

    /// The user record could not be serialized.
    #[error("failed to encode user record: {0}")]
    Encode(String),
}
