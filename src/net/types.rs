//! Wire DTOs for the user-management API and the HTTP error type.
//!
//! DESIGN
//! ======
//! Field names mirror the backend JSON so serde needs no renames. Identity
//! payloads may carry extra fields; unknown keys are ignored.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by calls against the backend API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected payload.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl ApiError {
    /// HTTP status code, if the backend produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected a registration because the username or
    /// email is already taken.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self.status(), Some(400 | 409))
    }

    /// Whether the backend rejected the bearer credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

// =============================================================================
// USER IDENTITY
// =============================================================================

/// An account as returned by `/users/me` and `/users`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend-assigned numeric identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Older backends omit this; absent means active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// ISO-8601 creation date or datetime, if the backend recorded one.
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_active() -> bool {
    true
}

// =============================================================================
// REQUESTS / RESPONSES
// =============================================================================

/// Form body for `POST /token`.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response body of `POST /token`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// JSON body for `POST /register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}
