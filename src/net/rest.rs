//! Authorized REST client for the household resources.
//!
//! SYSTEM CONTEXT
//! ==============
//! Dashboards read the member roster and the monthly reports through
//! `ApiClient`. Every request goes through the shared `RequestAuthorizer`, so
//! the header always reflects the session at the moment the request is built.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "rest_test.rs"]
mod rest_test;

use serde::de::DeserializeOwned;

use super::authorizer::RequestAuthorizer;
use super::types::{MealRate, MonthlyReport, User};
use crate::config::ClientConfig;
use crate::error::ApiError;

pub const USERS_ENDPOINT: &str = "/api/users";

/// Calendar month a report covers. `month` is 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportPeriod {
    pub month: u32,
    pub year: i32,
}

impl ReportPeriod {
    /// The current month in the browser's local time. Host builds have no
    /// clock to consult and return `None`.
    pub fn current() -> Option<Self> {
        #[cfg(feature = "csr")]
        {
            let now = js_sys::Date::new_0();
            Some(Self { month: now.get_month() + 1, year: i32::try_from(now.get_full_year()).ok()? })
        }
        #[cfg(not(feature = "csr"))]
        {
            None
        }
    }
}

pub fn meal_rate_report_endpoint(period: ReportPeriod) -> String {
    format!("/api/reports/meal-rate/{}/{}", period.month, period.year)
}

pub fn monthly_report_endpoint(period: ReportPeriod) -> String {
    format!("/api/reports/monthly/{}/{}", period.month, period.year)
}

/// REST client that stamps the current session token on each request.
#[derive(Clone, Debug)]
pub struct ApiClient {
    config: ClientConfig,
    authorizer: RequestAuthorizer,
}

impl ApiClient {
    pub fn new(config: ClientConfig, authorizer: RequestAuthorizer) -> Self {
        Self { config, authorizer }
    }

    pub fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// Whether the next request would carry a token.
    pub fn is_authorized(&self) -> bool {
        self.authorizer.is_set()
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-success status, or a body
    /// that does not decode as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        #[cfg(feature = "csr")]
        {
            let request = self.authorizer.authorize(gloo_net::http::Request::get(&self.url(path)));
            let resp = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
            super::api::read_json(resp).await
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = path;
            Err(ApiError::Unavailable)
        }
    }

    /// Fetch the household roster from `GET /api/users`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ApiClient::get_json`].
    pub async fn fetch_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json(USERS_ENDPOINT).await
    }

    /// Fetch per-member totals for `period`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ApiClient::get_json`].
    pub async fn fetch_monthly_report(&self, period: ReportPeriod) -> Result<MonthlyReport, ApiError> {
        self.get_json(&monthly_report_endpoint(period)).await
    }

    /// Fetch the household meal rate for `period`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ApiClient::get_json`].
    pub async fn fetch_meal_rate(&self, period: ReportPeriod) -> Result<MealRate, ApiError> {
        self.get_json(&meal_rate_report_endpoint(period)).await
    }
}
