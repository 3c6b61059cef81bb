//! Application Context
//!
//! The one object views are built from. It owns the configuration, the
//! key/value storage, the session store mirrored into that storage, and the
//! backend client that reads its credential from the same storage.

use crate::api::{ApiClient, ApiResult, ChatBackend};
use crate::config::Config;
use crate::routes::{self, Navigation};
use crate::session::{Session, SessionStore};
use crate::storage::{FileStore, KeyValueStore};
use crate::views::{ChatView, LoginForm, ProfileView, RegisterForm};
use std::sync::Arc;

/// Shared client context, cheap to clone
#[derive(Clone)]
pub struct App {
    config: Arc<Config>,
    storage: Arc<dyn KeyValueStore>,
    session: Arc<SessionStore>,
    backend: Arc<dyn ChatBackend>,
}

impl App {
    /// Build the context with a file store in the configured data directory
    pub fn new(config: Config) -> ApiResult<Self> {
        let data_dir = config.storage.data_path();
        tracing::info!("Data directory: {:?}", data_dir);

        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::in_dir(data_dir));
        Self::with_storage(config, storage)
    }

    /// Build the context over any store, talking to the configured backend
    pub fn with_storage(config: Config, storage: Arc<dyn KeyValueStore>) -> ApiResult<Self> {
        let client = ApiClient::new(&config.api, Arc::clone(&storage))?;
        tracing::info!("Chat backend: {}", client.base_url());

        Ok(Self::with_backend(config, storage, Arc::new(client)))
    }

    /// Build the context around an existing backend
    pub fn with_backend(
        config: Config,
        storage: Arc<dyn KeyValueStore>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        let session = Arc::new(SessionStore::hydrate(Arc::clone(&storage)));

        Self {
            config: Arc::new(config),
            storage,
            session,
            backend,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn backend(&self) -> &Arc<dyn ChatBackend> {
        &self.backend
    }

    /// Current session snapshot
    pub fn current_session(&self) -> Session {
        self.session.snapshot()
    }

    /// Resolve `path` against the current session
    pub fn navigate(&self, path: &str) -> Navigation {
        routes::navigate(path, &self.session.snapshot())
    }

    pub fn login_form(&self) -> LoginForm {
        LoginForm::new(self)
    }

    pub fn register_form(&self) -> RegisterForm {
        RegisterForm::new(self)
    }

    pub fn chat_view(&self) -> ChatView {
        ChatView::new(self)
    }

    pub fn profile_view(&self) -> ProfileView {
        ProfileView::new(self)
    }
}
