//! Session store: single source of truth for token presence, resolved
//! identity, and the resolution-in-progress flag.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owned by the application root and handed to the resolver, route guard and
//! views by value (it is cheap to clone). Every change is published on a
//! `watch` channel so route decisions are re-evaluated on each transition.
//!
//! Each resolution cycle takes a generation number. Outcomes are applied only
//! while their generation is still the latest, so a slow identity check can
//! never undo a newer login or logout.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::net::types::User;
use crate::storage::{Storage, TOKEN_KEY};

/// Resolved authentication status of this client instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unresolved,
    Authenticated(User),
    Anonymous,
}

/// Resolution flag paired with the session state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// True while an identity check is in flight; no redirect may be decided.
    pub resolving: bool,
    pub state: SessionState,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self { resolving: true, state: SessionState::Unresolved }
    }
}

impl SessionSnapshot {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }
}

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    state: Arc<watch::Sender<SessionSnapshot>>,
    // Held across check-and-publish so a stale cycle cannot interleave.
    generation: Arc<Mutex<u64>>,
}

impl SessionStore {
    /// A store in the startup state: resolving, `Unresolved`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self { storage, state: Arc::new(tx), generation: Arc::new(Mutex::new(0)) }
    }

    /// Persist `token`. Does not mark the session authenticated.
    pub fn set_token(&self, token: &str) {
        if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            tracing::warn!(error = %e, "failed to persist session token");
        }
    }

    /// Read the persisted token. Storage failures read as absent.
    #[must_use]
    pub fn get_token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session token");
                None
            }
        }
    }

    /// Remove the token, drop the identity and settle as `Anonymous`.
    ///
    /// Any resolution cycle still in flight is superseded. Calling this on an
    /// already anonymous session publishes nothing.
    pub fn clear(&self) {
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        self.remove_token();
        self.publish(SessionSnapshot { resolving: false, state: SessionState::Anonymous });
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified on every session transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Start a resolution cycle and return its generation. Earlier cycles
    /// stop being current.
    pub(crate) fn begin_resolution(&self) -> u64 {
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        self.publish(SessionSnapshot::default());
        *generation
    }

    /// Settle cycle `generation` as authenticated. Returns false, changing
    /// nothing, if a newer cycle, login or logout has started since.
    pub(crate) fn authenticate(&self, generation: u64, user: User) -> bool {
        let current = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != generation {
            return false;
        }
        self.publish(SessionSnapshot { resolving: false, state: SessionState::Authenticated(user) });
        true
    }

    /// Settle cycle `generation` as anonymous, removing `rejected` if it is
    /// still the stored token. Returns false, changing nothing, if the cycle
    /// has been superseded.
    pub(crate) fn reject(&self, generation: u64, rejected: Option<&str>) -> bool {
        let current = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != generation {
            return false;
        }
        if rejected.is_some() && self.get_token().as_deref() == rejected {
            self.remove_token();
        }
        self.publish(SessionSnapshot { resolving: false, state: SessionState::Anonymous });
        true
    }

    fn remove_token(&self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "failed to remove session token");
        }
    }

    fn publish(&self, next: SessionSnapshot) {
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}
