//! Application root.
//!
//! DESIGN
//! ======
//! `App` owns the session store, resolver and backend client and hands them
//! to the router and pages explicitly. Construction spawns the one startup
//! resolution; `initialized` is the handle callers await before trusting a
//! route decision. Routers created earlier still work: they report
//! `Screen::Loading` until the resolution flag drops.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::net::api::{AuthApi, HttpApi};
use crate::net::types::ApiError;
use crate::routes::Router;
use crate::state::auth::AuthResolver;
use crate::state::session::{SessionSnapshot, SessionStore};
use crate::storage::{FileStorage, Storage};

pub struct App {
    config: AppConfig,
    api: Arc<dyn AuthApi>,
    auth: AuthResolver,
    init: Option<JoinHandle<SessionSnapshot>>,
}

impl App {
    /// Build the production stack (HTTP backend, file storage) and start
    /// resolution. Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: AppConfig) -> Result<Self, ApiError> {
        let api = HttpApi::new(
            &config.api_base_url,
            Duration::from_secs(config.http.request_secs),
            Duration::from_secs(config.http.connect_secs),
        )?;
        let storage = FileStorage::new(&config.state_dir);
        tracing::debug!(path = %storage.path().display(), base_url = api.base_url(), "starting session");
        Ok(Self::start(config, Arc::new(api), Arc::new(storage)))
    }

    /// Wire the given backend and storage and spawn the startup resolution.
    #[must_use]
    pub fn start(config: AppConfig, api: Arc<dyn AuthApi>, storage: Arc<dyn Storage>) -> Self {
        let store = SessionStore::new(storage);
        let auth = AuthResolver::new(api.clone(), store, config.identity_timeout);
        let init = tokio::spawn({
            let auth = auth.clone();
            async move { auth.resolve().await }
        });
        Self { config, api, auth, init: Some(init) }
    }

    /// Wait for the startup resolution. Later calls return the current
    /// snapshot immediately.
    pub async fn initialized(&mut self) -> SessionSnapshot {
        if let Some(init) = self.init.take() {
            match init.await {
                Ok(snapshot) => return snapshot,
                Err(e) => {
                    tracing::warn!(error = %e, "startup resolution task failed; clearing session");
                    self.auth.store().clear();
                }
            }
        }
        self.auth.store().snapshot()
    }

    #[must_use]
    pub fn router(&self) -> Router {
        Router::new(self.auth.store())
    }

    #[must_use]
    pub fn auth(&self) -> &AuthResolver {
        &self.auth
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        self.auth.store()
    }

    #[must_use]
    pub fn api(&self) -> &dyn AuthApi {
        self.api.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
