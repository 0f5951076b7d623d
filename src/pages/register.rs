//! Registration form: validation and submission.
//!
//! Registration never authenticates. A successful submit navigates to
//! `/login` where the user signs in with the new credentials.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use crate::routes::{Router, Screen};
use crate::state::auth::AuthResolver;

/// Backend password hashing truncates beyond this many characters.
pub const MAX_PASSWORD_CHARS: usize = 72;

const MISSING_FIELDS: &str = "Fill in username, email and password.";
const INVALID_EMAIL: &str = "Enter a valid email address.";
const PASSWORD_TOO_LONG: &str = "Password must be at most 72 characters.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// # Errors
///
/// Returns a user-facing message for blank fields, an email without `@`, or
/// an over-long password.
pub fn validate_register_input(username: &str, email: &str, password: &str) -> Result<RegisterForm, &'static str> {
    let username = username.trim();
    let email = email.trim();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(MISSING_FIELDS);
    }
    if !email.contains('@') {
        return Err(INVALID_EMAIL);
    }
    if password.chars().count() > MAX_PASSWORD_CHARS {
        return Err(PASSWORD_TOO_LONG);
    }
    Ok(RegisterForm { username: username.to_owned(), email: email.to_owned(), password: password.to_owned() })
}

/// Submit the registration form and move to `/login` on success.
///
/// # Errors
///
/// Returns the message to show on the form.
pub async fn submit_register(
    auth: &AuthResolver,
    router: &mut Router,
    username: &str,
    email: &str,
    password: &str,
) -> Result<Screen, &'static str> {
    let form = validate_register_input(username, email, password)?;
    auth.register(&form.username, &form.email, &form.password)
        .await
        .map_err(|e| e.user_message())?;
    Ok(router.navigate("/login"))
}
