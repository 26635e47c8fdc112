//! Wire DTOs for the auth, user and report endpoints.
//!
//! DESIGN
//! ======
//! `User` is also the record persisted in the credential cache, so the same
//! serde shape is used for the network payload and the cached JSON blob.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Household role assigned at registration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Member,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Parse a form value; anything unrecognized is a member.
    pub fn from_form_value(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("admin") { Self::Admin } else { Self::Member }
    }
}

/// A household member as returned by the API and cached client-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server identifier. Accepts `_id` and numeric ids.
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login email, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Body of `POST /api/auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful `POST /api/auth/login` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Body of `POST /api/auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Successful `POST /api/auth/register` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub token: String,
}

/// Minimal user reference embedded in report rows.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ReportUser {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// One member's row in `GET /api/reports/monthly/{month}/{year}`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberReport {
    pub user: ReportUser,
    #[serde(default)]
    pub total_meals: f64,
    #[serde(default)]
    pub total_deposit_this_month: f64,
    #[serde(default)]
    pub meal_rate: f64,
    #[serde(default)]
    pub total_cost: f64,
}

/// `GET /api/reports/monthly/{month}/{year}` response.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MonthlyReport {
    #[serde(default)]
    pub reports: Vec<MemberReport>,
}

impl MonthlyReport {
    /// The row belonging to `user_id`, if the month has one.
    pub fn for_user(&self, user_id: &str) -> Option<&MemberReport> {
        self.reports.iter().find(|r| r.user.id == user_id)
    }
}

/// `GET /api/reports/meal-rate/{month}/{year}` response.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRate {
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub total_expenses: f64,
    #[serde(default)]
    pub total_meals: f64,
    #[serde(default)]
    pub meal_rate: f64,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        _ => Err(D::Error::custom("expected string or number id")),
    }
}
