//! Shared fixtures for unit tests: a scriptable in-memory backend and
//! canned identities.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::net::api::AuthApi;
use crate::net::types::{ApiError, User};
use crate::state::auth::AuthResolver;
use crate::state::session::SessionStore;
use crate::storage::MemoryStorage;

pub fn alice() -> User {
    User {
        id: 1,
        username: "alice".to_owned(),
        email: "a@x.com".to_owned(),
        is_active: true,
        created_at: Some("2024-01-01".to_owned()),
    }
}

pub fn user(id: i64, username: &str, is_active: bool, created_at: Option<&str>) -> User {
    User {
        id,
        username: username.to_owned(),
        email: format!("{username}@x.com"),
        is_active,
        created_at: created_at.map(str::to_owned),
    }
}

fn unauthorized() -> ApiError {
    ApiError::Status { status: 401, body: r#"{"detail":"Invalid credentials"}"#.to_owned() }
}

// =============================================================================
// MockApi
// =============================================================================

#[derive(Default)]
pub struct MockApi {
    logins: HashMap<(String, String), String>,
    identities: HashMap<String, User>,
    directory: Vec<User>,
    taken: HashSet<String>,
    gate: Option<Arc<Notify>>,
    token_gates: HashMap<String, Arc<Notify>>,
    hang_identity: bool,
    calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scenario backend: alice/correct -> T1, T1 -> alice.
    pub fn standard() -> Self {
        Self::new().with_login("alice", "correct", "T1").with_identity("T1", alice())
    }

    pub fn with_login(mut self, username: &str, password: &str, token: &str) -> Self {
        self.logins.insert((username.to_owned(), password.to_owned()), token.to_owned());
        self
    }

    pub fn with_identity(mut self, token: &str, user: User) -> Self {
        self.identities.insert(token.to_owned(), user);
        self
    }

    pub fn with_directory(mut self, users: Vec<User>) -> Self {
        self.directory = users;
        self
    }

    pub fn with_taken_username(mut self, username: &str) -> Self {
        self.taken.insert(username.to_owned());
        self
    }

    /// Identity responses wait until the gate is notified.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Identity responses for `token` alone wait until the gate is notified.
    pub fn with_gate_for(mut self, token: &str, gate: Arc<Notify>) -> Self {
        self.token_gates.insert(token.to_owned(), gate);
        self
    }

    /// Identity requests never answer.
    pub fn hanging_identity(mut self) -> Self {
        self.hang_identity = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn identity_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("me:")).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl AuthApi for MockApi {
    async fn exchange_token(&self, username: &str, password: &str) -> Result<String, ApiError> {
        self.record(format!("token:{username}"));
        self.logins
            .get(&(username.to_owned(), password.to_owned()))
            .cloned()
            .ok_or_else(unauthorized)
    }

    async fn fetch_current_user(&self, token: &str) -> Result<User, ApiError> {
        self.record(format!("me:{token}"));
        if self.hang_identity {
            std::future::pending::<()>().await;
        }
        if let Some(gate) = self.token_gates.get(token).or(self.gate.as_ref()) {
            gate.notified().await;
        }
        self.identities.get(token).cloned().ok_or_else(unauthorized)
    }

    async fn register(&self, username: &str, _email: &str, _password: &str) -> Result<(), ApiError> {
        self.record(format!("register:{username}"));
        if self.taken.contains(username) {
            return Err(ApiError::Status {
                status: 400,
                body: r#"{"detail":"Username or email already registered"}"#.to_owned(),
            });
        }
        Ok(())
    }

    async fn list_users(&self, token: &str) -> Result<Vec<User>, ApiError> {
        self.record(format!("users:{token}"));
        if !self.identities.contains_key(token) {
            return Err(unauthorized());
        }
        Ok(self.directory.clone())
    }
}

/// Resolver over `api` with optional pre-seeded token and no timeout.
pub fn resolver(api: Arc<MockApi>, token: Option<&str>) -> AuthResolver {
    let storage = match token {
        Some(token) => MemoryStorage::with_token(token),
        None => MemoryStorage::new(),
    };
    let store = SessionStore::new(Arc::new(storage));
    AuthResolver::new(api, store, None)
}
