//! Auth resolver: turns a persisted token into a definitive session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs once at startup (driven by `App::start`) and again inside every
//! login. Route guards only observe its effects through the session store.
//!
//! ERROR HANDLING
//! ==============
//! Any identity-check failure (rejected token, transport error, malformed
//! payload, timeout) collapses to `Anonymous` with the token removed. Only
//! login and registration surface errors to callers.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;
use std::time::Duration;

use crate::net::api::AuthApi;
use crate::net::types::{ApiError, User};
use crate::state::session::{SessionSnapshot, SessionStore};

pub const LOGIN_FAILED_MESSAGE: &str = "Invalid username or password. Please try again.";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Username or email may already be taken.";

/// Errors surfaced by login and registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The token exchange was rejected or could not be completed.
    #[error("credential exchange failed: {0}")]
    Credentials(#[source] ApiError),

    /// The identity check after a token was obtained failed.
    #[error("session invalid: {0}")]
    SessionInvalid(#[source] ApiError),

    /// The identity check did not answer within the configured limit.
    #[error("identity check timed out after {0:?}")]
    TimedOut(Duration),

    /// A logout or newer login replaced the session while this login waited.
    #[error("login superseded by a newer session change")]
    Superseded,

    /// The backend refused to create the account.
    #[error("registration failed: {0}")]
    Registration(#[source] ApiError),
}

impl AuthError {
    /// Message shown on the form that triggered the failure.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Credentials(_) | Self::SessionInvalid(_) | Self::TimedOut(_) | Self::Superseded => {
                LOGIN_FAILED_MESSAGE
            }
            Self::Registration(_) => REGISTRATION_FAILED_MESSAGE,
        }
    }
}

#[derive(Clone)]
pub struct AuthResolver {
    api: Arc<dyn AuthApi>,
    store: SessionStore,
    identity_timeout: Option<Duration>,
}

impl AuthResolver {
    /// `identity_timeout` of `None` waits for the identity check indefinitely.
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, store: SessionStore, identity_timeout: Option<Duration>) -> Self {
        Self { api, store, identity_timeout }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Run one resolution cycle and return the settled snapshot.
    ///
    /// Without a persisted token no request is made. With one, exactly one
    /// identity request is issued; failure removes the token. If a login or
    /// logout supersedes this cycle while the request is in flight, its
    /// outcome is discarded.
    pub async fn resolve(&self) -> SessionSnapshot {
        let generation = self.store.begin_resolution();
        let Some(token) = self.store.get_token() else {
            tracing::debug!("no persisted token; session anonymous");
            self.store.reject(generation, None);
            return self.store.snapshot();
        };

        let applied = match self.check_identity(&token).await {
            Ok(user) => {
                tracing::info!(username = %user.username, "session resolved");
                self.store.authenticate(generation, user)
            }
            Err(e) => {
                tracing::info!(error = %e, "persisted token rejected; session anonymous");
                self.store.reject(generation, Some(&token))
            }
        };
        if !applied {
            tracing::debug!(generation, "resolution superseded; outcome discarded");
        }
        self.store.snapshot()
    }

    /// Exchange credentials for a token, persist it, then resolve identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Credentials`] if the exchange fails (stored state
    /// untouched), [`AuthError::SessionInvalid`] / [`AuthError::TimedOut`]
    /// if the identity check fails (token removed, session anonymous), or
    /// [`AuthError::Superseded`] if a logout or another login took over first.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let token = self.api.exchange_token(username, password).await.map_err(|e| {
            tracing::warn!(%username, error = %e, "token exchange failed");
            AuthError::Credentials(e)
        })?;

        self.store.set_token(&token);
        let generation = self.store.begin_resolution();

        match self.check_identity(&token).await {
            Ok(user) => {
                if !self.store.authenticate(generation, user.clone()) {
                    tracing::info!(%username, "login superseded before identity arrived");
                    return Err(AuthError::Superseded);
                }
                tracing::info!(username = %user.username, "login succeeded");
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(%username, error = %e, "identity check after login failed");
                if !self.store.reject(generation, Some(&token)) {
                    return Err(AuthError::Superseded);
                }
                Err(e)
            }
        }
    }

    /// Create an account. Does not authenticate; callers log in separately.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Registration`] if the backend rejects the request.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), AuthError> {
        self.api.register(username, email, password).await.map_err(|e| {
            tracing::warn!(%username, error = %e, "registration failed");
            AuthError::Registration(e)
        })?;
        tracing::info!(%username, "account registered");
        Ok(())
    }

    /// Drop the session locally. No network call.
    pub fn logout(&self) {
        self.store.clear();
        tracing::info!("logged out");
    }

    async fn check_identity(&self, token: &str) -> Result<User, AuthError> {
        let request = self.api.fetch_current_user(token);
        let result = match self.identity_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| AuthError::TimedOut(limit))?,
            None => request.await,
        };
        result.map_err(AuthError::SessionInvalid)
    }
}
