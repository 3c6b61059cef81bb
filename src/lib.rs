//! # Parley
//!
//! Client for a REST group-chat service: persistent sessions, token
//! authenticated requests, and a chat view that keeps itself fresh by
//! polling.
//!
//! ## Modules
//!
//! - [`storage`]: Key/value storage the session is persisted to
//! - [`session`]: Credential and identity of the signed-in member
//! - [`api`]: HTTP client for the chat backend
//! - [`routes`]: Screens and the guards in front of them
//! - [`views`]: Login, registration, chat and profile screen logic
//! - [`app`]: Context object views are built from
//! - [`config`]: TOML and environment configuration
//! - [`logging`]: `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parley::{App, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::new(Config::load_default())?;
//!
//!     let mut login = app.login_form();
//!     login.username = "alice".to_string();
//!     login.password = "secret".to_string();
//!     if login.submit().await.is_none() {
//!         println!("{}", login.error().unwrap_or_default());
//!         return Ok(());
//!     }
//!
//!     let chat = app.chat_view();
//!     chat.mount().await;
//!     chat.send("Hello everyone").await;
//!
//!     for message in chat.state().messages {
//!         println!("{}: {}", message.author_username, message.text);
//!     }
//!
//!     chat.unmount();
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod routes;
pub mod session;
pub mod storage;
pub mod views;

// Re-export top-level types for convenience
pub use app::App;

pub use api::{
    ApiClient, ApiError, ApiResult, AuthResponse, ChatBackend, Credentials, ErrorBody, Member,
    Message, NewMessage, Profile, ProfileUpdate,
};

pub use config::{ApiConfig, ChatConfig, Config, ConfigError, LoggingConfig, StorageConfig};

pub use routes::{Navigation, Route};

pub use session::{Session, SessionStore};

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult};

pub use views::{
    ChatPhase, ChatState, ChatView, LoginForm, ProfileState, ProfileView, RegisterForm,
    ValidationError,
};
