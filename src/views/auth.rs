//! Login and registration forms
//!
//! One-shot forms: validate locally, submit once, and on success start the
//! session and send the user home.

use crate::api::{ApiError, AuthResponse, ChatBackend, Credentials};
use crate::app::App;
use crate::routes::Route;
use crate::session::SessionStore;
use crate::views::validation::{validate_login, validate_registration};
use std::sync::Arc;

const LOGIN_FAILED: &str = "Invalid username or password.";
const REGISTRATION_FAILED: &str = "Failed to complete registration.";

/// Sign-in form
pub struct LoginForm {
    backend: Arc<dyn ChatBackend>,
    session: Arc<SessionStore>,
    pub username: String,
    pub password: String,
    error: Option<String>,
}

impl LoginForm {
    pub fn new(app: &App) -> Self {
        Self {
            backend: Arc::clone(app.backend()),
            session: Arc::clone(app.session()),
            username: String::new(),
            password: String::new(),
            error: None,
        }
    }

    /// Message to show under the form
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit the form, returning where to go on success
    pub async fn submit(&mut self) -> Option<Route> {
        self.error = None;

        if let Err(e) = validate_login(&self.username, &self.password) {
            self.error = Some(e.to_string());
            return None;
        }

        let credentials = Credentials::new(&self.username, &self.password);
        match self.backend.login(&credentials).await {
            Ok(resp) => Some(start_session(&self.session, resp)),
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                self.error = Some(login_error_message(&e));
                None
            }
        }
    }
}

/// Account creation form
pub struct RegisterForm {
    backend: Arc<dyn ChatBackend>,
    session: Arc<SessionStore>,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    error: Option<String>,
}

impl RegisterForm {
    pub fn new(app: &App) -> Self {
        Self {
            backend: Arc::clone(app.backend()),
            session: Arc::clone(app.session()),
            username: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            error: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit the form; a new account is signed in right away
    pub async fn submit(&mut self) -> Option<Route> {
        self.error = None;

        if let Err(e) =
            validate_registration(&self.username, &self.password, &self.confirm_password)
        {
            self.error = Some(e.to_string());
            return None;
        }

        let credentials = Credentials::new(&self.username, &self.password);
        match self.backend.register(&credentials).await {
            Ok(resp) => Some(start_session(&self.session, resp)),
            Err(e) => {
                tracing::warn!(error = %e, "Registration failed");
                self.error = Some(e.user_message(Some("username"), REGISTRATION_FAILED));
                None
            }
        }
    }
}

fn start_session(session: &SessionStore, resp: AuthResponse) -> Route {
    session.login(resp.token, resp.member);
    Route::Home
}

/// Login only ever surfaces the server's `detail`
fn login_error_message(err: &ApiError) -> String {
    err.user_message(None, LOGIN_FAILED)
}
