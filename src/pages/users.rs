//! User table: search and status filtering.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use std::fmt::Write;
use std::str::FromStr;

use crate::net::types::User;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    fn admits(self, user: &User) -> bool {
        match self {
            Self::All => true,
            Self::Active => user.is_active,
            Self::Inactive => !user.is_active,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown status filter '{other}' (expected all, active or inactive)")),
        }
    }
}

/// Users whose username or email contains `search` (case-insensitive) and
/// whose status passes `status`. An empty search matches everyone.
#[must_use]
pub fn filter_users<'a>(users: &'a [User], search: &str, status: StatusFilter) -> Vec<&'a User> {
    let needle = search.trim().to_lowercase();
    users
        .iter()
        .filter(|u| {
            needle.is_empty()
                || u.username.to_lowercase().contains(&needle)
                || u.email.to_lowercase().contains(&needle)
        })
        .filter(|u| status.admits(u))
        .collect()
}

#[must_use]
pub fn render(users: &[&User]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>6}  {:<20} {:<30} {:<8} {}", "ID", "USERNAME", "EMAIL", "STATUS", "CREATED");
    for user in users {
        let status = if user.is_active { "active" } else { "inactive" };
        let _ = writeln!(
            out,
            "{:>6}  {:<20} {:<30} {:<8} {}",
            user.id,
            user.username,
            user.email,
            status,
            user.created_at.as_deref().unwrap_or("-"),
        );
    }
    let _ = writeln!(out, "{} user(s)", users.len());
    out
}
