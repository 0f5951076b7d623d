//! Login form: validation and submission.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use crate::routes::{Router, Screen};
use crate::state::auth::AuthResolver;

const MISSING_FIELDS: &str = "Enter both username and password.";

/// Trim the username and require both fields.
///
/// # Errors
///
/// Returns a user-facing message when either field is blank.
pub fn validate_login_input(username: &str, password: &str) -> Result<(String, String), &'static str> {
    let username = username.trim();
    if username.is_empty() || password.trim().is_empty() {
        return Err(MISSING_FIELDS);
    }
    Ok((username.to_owned(), password.to_owned()))
}

/// Submit the login form. On success the login entry is replaced by
/// `/dashboard`; on failure the router stays on `/login`.
///
/// # Errors
///
/// Returns the message to show on the form.
pub async fn submit_login(
    auth: &AuthResolver,
    router: &mut Router,
    username: &str,
    password: &str,
) -> Result<Screen, &'static str> {
    let (username, password) = validate_login_input(username, password)?;
    auth.login(&username, &password)
        .await
        .map_err(|e| e.user_message())?;
    Ok(router.replace("/dashboard"))
}
