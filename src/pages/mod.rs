//! View layer: form handling and data shaping for each screen.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages consume the session store and the backend API injected by `App`.
//! They never decide access themselves; the router's guard has already
//! admitted the user before a protected page loads data.

pub mod dashboard;
pub mod login;
pub mod profile;
pub mod register;
pub mod settings;
pub mod users;

use crate::net::api::AuthApi;
use crate::net::types::{ApiError, User};
use crate::state::session::SessionStore;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("not signed in")]
    NotAuthenticated,
    #[error("could not load users: {0}")]
    Api(#[from] ApiError),
}

/// Load the user directory with the stored bearer token.
///
/// # Errors
///
/// Returns [`PageError::NotAuthenticated`] without a token, or the backend
/// failure otherwise.
pub async fn fetch_users(api: &dyn AuthApi, store: &SessionStore) -> Result<Vec<User>, PageError> {
    let token = store.get_token().ok_or(PageError::NotAuthenticated)?;
    let users = api.list_users(&token).await?;
    tracing::debug!(count = users.len(), "loaded user directory");
    Ok(users)
}
