//! Profile screen for the signed-in user.

use std::fmt::Write;

use crate::net::types::User;

#[must_use]
pub fn render(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Username: {}", user.username);
    let _ = writeln!(out, "Email:    {}", user.email);
    let _ = writeln!(out, "User ID:  {}", user.id);
    let _ = writeln!(out, "Status:   {}", if user.is_active { "active" } else { "inactive" });
    let _ = writeln!(out, "Joined:   {}", user.created_at.as_deref().unwrap_or("unknown"));
    out
}
