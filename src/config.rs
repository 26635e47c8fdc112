//! Client configuration resolved at build time.
//!
//! The API base URL is baked into the WASM bundle from `MESS_API_URL` when the
//! crate is compiled, since a static bundle has no process environment.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
}

impl ClientConfig {
    /// Build config from the compile-time environment.
    ///
    /// Optional:
    /// - `MESS_API_URL`: REST API base URL, default `http://localhost:5000`
    pub fn from_env() -> Self {
        Self::from_api_url(option_env!("MESS_API_URL"))
    }

    fn from_api_url(raw: Option<&str>) -> Self {
        let api_url = raw
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_owned();
        Self { api_url }
    }

    /// Join an absolute API path (`/api/...`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_api_url(None)
    }
}
