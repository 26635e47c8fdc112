//! Dashboard page, split by household role.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered only behind `PrivateRoute`. Admins get the member roster from
//! `GET /api/users` and this month's meal rate; members get their profile card
//! and their own row of the monthly report.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;

use crate::app::ApiHandle;
use crate::error::ApiError;
use crate::net::rest::ReportPeriod;
use crate::net::types::{MealRate, MemberReport, Role, User};
use crate::state::session::Session;

const ROSTER_FAILED_FALLBACK: &str = "Could not load members";
const REPORT_FAILED_FALLBACK: &str = "Could not load this month's report";
const NO_REPORT: &str = "No data available for this month.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashboardKind {
    Admin,
    Member,
}

impl DashboardKind {
    /// Anyone who is not explicitly an admin sees the member view.
    pub fn for_user(user: Option<&User>) -> Self {
        if user.is_some_and(User::is_admin) { Self::Admin } else { Self::Member }
    }
}

fn welcome_line(user: Option<&User>) -> String {
    match user {
        Some(user) => format!("Welcome, {}", user.name),
        None => "Welcome".to_owned(),
    }
}

fn roster_summary(users: &[User]) -> String {
    let admins = users.iter().filter(|u| u.role == Role::Admin).count();
    let members = users.len() - admins;
    let plural = |n: usize, word: &str| if n == 1 { format!("{n} {word}") } else { format!("{n} {word}s") };
    format!("{}, {}", plural(members, "member"), plural(admins, "admin"))
}

fn profile_rows(user: &User) -> Vec<(&'static str, String)> {
    vec![
        ("Name", user.name.clone()),
        ("Email", user.email.clone().unwrap_or_else(|| "not provided".to_owned())),
        ("Role", user.role.as_str().to_owned()),
    ]
}

/// Whole amounts print without decimals, everything else with two.
fn format_amount(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON { format!("{value:.0}") } else { format!("{value:.2}") }
}

fn report_tiles(report: &MemberReport) -> Vec<(&'static str, String)> {
    vec![
        ("Total Meals", format_amount(report.total_meals)),
        ("Deposit (This Month)", format_amount(report.total_deposit_this_month)),
        ("Meal Rate", format_amount(report.meal_rate)),
        ("Total Cost", format_amount(report.total_cost)),
    ]
}

fn meal_rate_line(rate: &MealRate) -> String {
    format!(
        "{}/{}: {} ÷ {} meals = {} per meal",
        rate.month,
        rate.year,
        format_amount(rate.total_expenses),
        format_amount(rate.total_meals),
        format_amount(rate.meal_rate)
    )
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let kind = Memo::new(move |_| DashboardKind::for_user(session.get().user.as_ref()));

    view! {
        <div class="dashboard">
            <h1>"Dashboard"</h1>
            <p class="dashboard__welcome">{move || welcome_line(session.get().user.as_ref())}</p>
            {move || match kind.get() {
                DashboardKind::Admin => view! { <AdminPanel/> }.into_any(),
                DashboardKind::Member => view! { <MemberPanel/> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn AdminPanel() -> impl IntoView {
    let api = expect_context::<ApiHandle>();
    let roster = RwSignal::new(None::<Result<Vec<User>, ApiError>>);
    let meal_rate = RwSignal::new(None::<MealRate>);

    let client = api.get_value();
    leptos::task::spawn_local(async move {
        let result = client.fetch_users().await;
        if let Err(e) = &result {
            leptos::logging::warn!("roster fetch failed: {e}");
        }
        roster.set(Some(result));

        if let Some(period) = ReportPeriod::current() {
            match client.fetch_meal_rate(period).await {
                Ok(rate) => meal_rate.set(Some(rate)),
                Err(e) => leptos::logging::warn!("meal rate fetch failed: {e}"),
            }
        }
    });

    view! {
        <section class="dashboard__panel">
            <h2>"Admin Dashboard"</h2>
            {move || meal_rate.get().map(|rate| view! { <p class="dashboard__rate">{meal_rate_line(&rate)}</p> })}
            {move || match roster.get() {
                None => view! { <p>"Loading members..."</p> }.into_any(),
                Some(Err(e)) => {
                    view! { <p class="dashboard__error">{e.user_message(ROSTER_FAILED_FALLBACK)}</p> }.into_any()
                }
                Some(Ok(users)) => {
                    let summary = roster_summary(&users);
                    view! {
                        <p class="dashboard__summary">{summary}</p>
                        <table class="dashboard__table">
                            <thead>
                                <tr>
                                    <th>"Name"</th>
                                    <th>"Email"</th>
                                    <th>"Role"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {users
                                    .into_iter()
                                    .map(|u| {
                                        view! {
                                            <tr>
                                                <td>{u.name}</td>
                                                <td>{u.email.unwrap_or_default()}</td>
                                                <td>{u.role.as_str()}</td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()}
                            </tbody>
                        </table>
                    }
                        .into_any()
                }
            }}
        </section>
    }
}

#[component]
fn MemberPanel() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let api = expect_context::<ApiHandle>();
    let report = RwSignal::new(None::<Result<Option<MemberReport>, ApiError>>);

    let client = api.get_value();
    let user_id = session.get_untracked().user.map(|u| u.id);
    leptos::task::spawn_local(async move {
        let result = match (ReportPeriod::current(), user_id) {
            (Some(period), Some(user_id)) => client
                .fetch_monthly_report(period)
                .await
                .map(|monthly| monthly.for_user(&user_id).cloned()),
            _ => Ok(None),
        };
        if let Err(e) = &result {
            leptos::logging::warn!("monthly report fetch failed: {e}");
        }
        report.set(Some(result));
    });

    view! {
        <section class="dashboard__panel">
            <h2>"Member Dashboard"</h2>
            <dl class="dashboard__profile">
                {move || {
                    session
                        .get()
                        .user
                        .map(|user| {
                            profile_rows(&user)
                                .into_iter()
                                .map(|(label, value)| view! { <dt>{label}</dt><dd>{value}</dd> })
                                .collect_view()
                        })
                }}
            </dl>
            {move || match report.get() {
                None => view! { <p>"Loading..."</p> }.into_any(),
                Some(Err(e)) => {
                    view! { <p class="dashboard__error">{e.user_message(REPORT_FAILED_FALLBACK)}</p> }.into_any()
                }
                Some(Ok(None)) => view! { <p>{NO_REPORT}</p> }.into_any(),
                Some(Ok(Some(row))) => {
                    view! {
                        <div class="dashboard__tiles">
                            {report_tiles(&row)
                                .into_iter()
                                .map(|(label, value)| {
                                    view! {
                                        <div class="dashboard__tile">
                                            <h3>{label}</h3>
                                            <p>{value}</p>
                                        </div>
                                    }
                                })
                                .collect_view()}
                        </div>
                    }
                        .into_any()
                }
            }}
        </section>
    }
}
