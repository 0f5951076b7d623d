//! Route table, route guard and navigation history.
//!
//! SYSTEM CONTEXT
//! ==============
//! `/login` and `/register` are public. `/dashboard`, `/users`, `/settings`
//! and `/profile` pass through the guard. `/` redirects to `/dashboard`.
//!
//! DESIGN
//! ======
//! The guard is a pure function of the session snapshot. `Router` holds a
//! `watch` receiver on the session store and re-runs the guard on every
//! evaluation, so a session change (logout, failed resolution) is reflected
//! the next time the current location is evaluated. While the resolution
//! flag is set the guard yields `Pending` and never redirects.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use tokio::sync::watch;

use crate::net::types::User;
use crate::state::session::{SessionSnapshot, SessionState, SessionStore};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Users,
    Settings,
    Profile,
    Root,
    NotFound(String),
}

impl Route {
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        match normalized {
            "/" => Self::Root,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/users" => Self::Users,
            "/settings" => Self::Settings,
            "/profile" => Self::Profile,
            _ => Self::NotFound(trimmed.to_owned()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Users => "/users",
            Self::Settings => "/settings",
            Self::Profile => "/profile",
            Self::Root => "/",
            Self::NotFound(path) => path,
        }
    }

    #[must_use]
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Users | Self::Settings | Self::Profile)
    }
}

// =============================================================================
// GUARD
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Resolution in flight: render a neutral placeholder.
    Pending,
    /// Not authenticated: replace the current entry with this route.
    Redirect(Route),
    /// Authenticated: render the protected view inside the layout.
    Render(User),
}

/// Decide whether a protected view may render under `snapshot`.
#[must_use]
pub fn guard(snapshot: &SessionSnapshot) -> GuardDecision {
    if snapshot.resolving {
        return GuardDecision::Pending;
    }
    match &snapshot.state {
        SessionState::Authenticated(user) => GuardDecision::Render(user.clone()),
        SessionState::Anonymous | SessionState::Unresolved => GuardDecision::Redirect(Route::Login),
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationEvent {
    Push(Route),
    Replace(Route),
}

/// What the view layer should draw for the current location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Public(Route),
    Protected { route: Route, user: User },
    NotFound(String),
}

/// History stack plus a log of every navigation performed.
#[derive(Debug, Default)]
pub struct Navigator {
    history: Vec<Route>,
    events: Vec<NavigationEvent>,
}

impl Navigator {
    pub fn push(&mut self, route: Route) {
        self.events.push(NavigationEvent::Push(route.clone()));
        self.history.push(route);
    }

    pub fn replace(&mut self, route: Route) {
        self.events.push(NavigationEvent::Replace(route.clone()));
        match self.history.last_mut() {
            Some(current) => *current = route,
            None => self.history.push(route),
        }
    }

    /// Step back one entry. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.history.len() <= 1 {
            return false;
        }
        self.history.pop();
        true
    }

    #[must_use]
    pub fn current(&self) -> Option<&Route> {
        self.history.last()
    }

    #[must_use]
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    #[must_use]
    pub fn events(&self) -> &[NavigationEvent] {
        &self.events
    }
}

pub struct Router {
    session: watch::Receiver<SessionSnapshot>,
    navigator: Navigator,
}

impl Router {
    #[must_use]
    pub fn new(store: &SessionStore) -> Self {
        Self { session: store.subscribe(), navigator: Navigator::default() }
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub fn location(&self) -> Option<&Route> {
        self.navigator.current()
    }

    /// Push `path` and evaluate it against the current session.
    pub fn navigate(&mut self, path: &str) -> Screen {
        self.navigator.push(Route::parse(path));
        self.evaluate()
    }

    /// Replace the current entry with `path` and evaluate it.
    pub fn replace(&mut self, path: &str) -> Screen {
        self.navigator.replace(Route::parse(path));
        self.evaluate()
    }

    /// Step back in history and evaluate the entry landed on.
    pub fn back(&mut self) -> Screen {
        self.navigator.back();
        self.evaluate()
    }

    /// Push `path`, wait for resolution to finish, then evaluate.
    pub async fn settle(&mut self, path: &str) -> Screen {
        self.navigator.push(Route::parse(path));
        self.wait_resolved().await;
        self.evaluate()
    }

    /// Wait for the next session transition and re-evaluate the current
    /// location. Returns `None` once the session store is gone.
    pub async fn next_change(&mut self) -> Option<Screen> {
        self.session.changed().await.ok()?;
        Some(self.evaluate())
    }

    /// Evaluate the current location, applying any redirect.
    pub fn evaluate(&mut self) -> Screen {
        let Some(route) = self.navigator.current().cloned() else {
            return Screen::Loading;
        };
        match route {
            Route::Root => {
                self.navigator.replace(Route::Dashboard);
                self.evaluate()
            }
            Route::NotFound(path) => Screen::NotFound(path),
            route if !route.is_protected() => Screen::Public(route),
            route => {
                let snapshot = self.session.borrow_and_update().clone();
                match guard(&snapshot) {
                    GuardDecision::Pending => Screen::Loading,
                    GuardDecision::Render(user) => Screen::Protected { route, user },
                    GuardDecision::Redirect(target) => {
                        tracing::debug!(from = route.path(), to = target.path(), "guard redirect");
                        self.navigator.replace(target.clone());
                        Screen::Public(target)
                    }
                }
            }
        }
    }

    async fn wait_resolved(&mut self) {
        if self.session.wait_for(|s| !s.resolving).await.is_err() {
            tracing::warn!("session store dropped while waiting for resolution");
        }
    }
}
