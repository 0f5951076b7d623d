//! REST client for the user-management backend.
//!
//! ARCHITECTURE
//! ============
//! `AuthApi` is the seam the session core depends on. `HttpApi` is the
//! production implementation over `reqwest`; tests substitute in-memory mocks.
//! Response parsing is split into pure functions so payload handling can be
//! tested without a server.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use super::types::{ApiError, RegisterRequest, TokenRequest, TokenResponse, User};

/// Backend operations consumed by the auth core and the view layer.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange username/password for a bearer token via `POST /token`.
    async fn exchange_token(&self, username: &str, password: &str) -> Result<String, ApiError>;

    /// Fetch the identity bound to `token` via `GET /users/me`.
    async fn fetch_current_user(&self, token: &str) -> Result<User, ApiError>;

    /// Create an account via `POST /register`. Does not authenticate.
    async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), ApiError>;

    /// List all accounts via `GET /users`.
    async fn list_users(&self, token: &str) -> Result<Vec<User>, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client rooted at `base_url` (e.g. `http://127.0.0.1:8000/api`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the TLS backend fails to initialize.
    pub fn new(base_url: &str, request_timeout: Duration, connect_timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_body(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body });
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpApi {
    async fn exchange_token(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .post(endpoint(&self.base_url, "/token"))
            .form(&TokenRequest { username, password })
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let body = Self::read_body(response).await?;
        parse_token(&body)
    }

    async fn fetch_current_user(&self, token: &str) -> Result<User, ApiError> {
        let response = self
            .http
            .get(endpoint(&self.base_url, "/users/me"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let body = Self::read_body(response).await?;
        parse_user(&body)
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(endpoint(&self.base_url, "/register"))
            .json(&RegisterRequest { username, email, password })
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Self::read_body(response).await?;
        Ok(())
    }

    async fn list_users(&self, token: &str) -> Result<Vec<User>, ApiError> {
        let response = self
            .http
            .get(endpoint(&self.base_url, "/users"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let body = Self::read_body(response).await?;
        parse_users(&body)
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{base_url}{path}")
}

fn parse_token(json: &str) -> Result<String, ApiError> {
    let resp: TokenResponse = serde_json::from_str(json).map_err(|e| ApiError::Parse(e.to_string()))?;
    if resp.access_token.is_empty() {
        return Err(ApiError::Parse("empty access_token".to_owned()));
    }
    Ok(resp.access_token)
}

fn parse_user(json: &str) -> Result<User, ApiError> {
    serde_json::from_str(json).map_err(|e| ApiError::Parse(e.to_string()))
}

fn parse_users(json: &str) -> Result<Vec<User>, ApiError> {
    serde_json::from_str(json).map_err(|e| ApiError::Parse(e.to_string()))
}
