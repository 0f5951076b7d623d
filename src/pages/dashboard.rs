//! Dashboard metrics derived from the user directory.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::collections::BTreeMap;
use std::fmt::Write;

use time::macros::format_description;
use time::Date;

use crate::net::types::User;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// Sign-ups per weekday, Sunday first. Undated users are not counted.
    pub signups_by_weekday: [usize; 7],
    /// Sign-ups per `(year, month)`, oldest first. Month is 1-based.
    pub signups_by_month: BTreeMap<(i32, u8), usize>,
}

impl DashboardStats {
    #[must_use]
    pub fn from_users(users: &[User]) -> Self {
        let mut stats = Self { total: users.len(), ..Self::default() };
        for user in users {
            if user.is_active {
                stats.active += 1;
            }
            if let Some(date) = user.created_at.as_deref().and_then(signup_date) {
                stats.signups_by_weekday[usize::from(date.weekday().number_days_from_sunday())] += 1;
                *stats.signups_by_month.entry((date.year(), u8::from(date.month()))).or_default() += 1;
            }
        }
        stats.inactive = stats.total - stats.active;
        stats
    }
}

/// Calendar date of an ISO date or datetime (`2024-01-01`, `2024-01-01T09:30:00`).
fn signup_date(created_at: &str) -> Option<Date> {
    let date = created_at.get(..10)?;
    Date::parse(date, format_description!("[year]-[month]-[day]")).ok()
}

#[must_use]
pub fn render(stats: &DashboardStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total users:    {}", stats.total);
    let _ = writeln!(out, "Active users:   {}", stats.active);
    let _ = writeln!(out, "Inactive users: {}", stats.inactive);
    let _ = writeln!(out);
    let _ = writeln!(out, "Sign-ups by weekday");
    for (label, count) in WEEKDAY_LABELS.iter().zip(stats.signups_by_weekday) {
        let _ = writeln!(out, "  {label}  {count:>4}  {}", "#".repeat(count));
    }
    if !stats.signups_by_month.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Sign-ups by month");
        for (&(year, month), &count) in &stats.signups_by_month {
            let _ = writeln!(out, "  {year:04}-{month:02}  {count:>4}  {}", "#".repeat(count));
        }
    }
    out
}
