//! Profile view
//!
//! Loads the signed-in member's profile, lets them rename themselves, and
//! keeps the session identity in step with what the server returns.

use crate::api::{ChatBackend, Profile, ProfileUpdate};
use crate::app::App;
use crate::routes::Route;
use crate::session::SessionStore;
use crate::views::scope::ViewState;
use crate::views::validation::validate_username;
use std::sync::Arc;
use tokio::sync::watch;

const LOAD_FAILED: &str = "Failed to load the profile.";
const SAVE_FAILED: &str = "Failed to save the profile.";
const SAVED: &str = "Profile saved.";

/// Everything the profile screen shows
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    /// Editable username
    pub username: String,
    pub is_loading: bool,
    pub is_saving: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl Default for ProfileState {
    fn default() -> Self {
        Self {
            profile: None,
            username: String::new(),
            is_loading: true,
            is_saving: false,
            error: None,
            success: None,
        }
    }
}

/// Profile screen
#[derive(Clone)]
pub struct ProfileView {
    backend: Arc<dyn ChatBackend>,
    session: Arc<SessionStore>,
    state: Arc<ViewState<ProfileState>>,
}

impl ProfileView {
    pub fn new(app: &App) -> Self {
        Self {
            backend: Arc::clone(app.backend()),
            session: Arc::clone(app.session()),
            state: ViewState::new(ProfileState::default()),
        }
    }

    pub fn state(&self) -> ProfileState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }

    /// Fetch the profile and refresh the session identity from it
    pub async fn load(&self) {
        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let result = self.backend.get_profile().await;
        let member = result.as_ref().ok().map(Profile::member);

        let applied = self.state.update(|s| {
            match result {
                Ok(profile) => {
                    s.username = profile.username.clone();
                    s.profile = Some(profile);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load profile");
                    s.error = Some(LOAD_FAILED.to_string());
                }
            }
            s.is_loading = false;
        });

        if !applied {
            tracing::debug!("Profile view closed before the profile arrived");
            return;
        }

        // Storage is written only after the state lock is released
        if let Some(member) = member {
            self.session.update_member(Some(member));
        }
    }

    /// Change the editable username
    pub fn set_username(&self, username: impl Into<String>) {
        let username = username.into();
        self.state.update(|s| s.username = username);
    }

    /// Save the edited username
    pub async fn save(&self) {
        let current = self.state.get();

        if let Err(e) = validate_username(&current.username) {
            self.state.update(|s| {
                s.error = Some(e.to_string());
                s.success = None;
            });
            return;
        }

        if current.profile.is_none() {
            return;
        }

        self.state.update(|s| {
            s.is_saving = true;
            s.error = None;
            s.success = None;
        });

        let update = ProfileUpdate {
            username: current.username,
        };

        match self.backend.update_profile(&update).await {
            Ok(profile) => {
                self.session.update_member(Some(profile.member()));
                self.state.update(|s| {
                    s.profile = Some(profile);
                    s.success = Some(SAVED.to_string());
                    s.is_saving = false;
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save profile");
                let message = e.user_message(Some("username"), SAVE_FAILED);
                self.state.update(|s| {
                    s.error = Some(message);
                    s.is_saving = false;
                });
            }
        }
    }

    /// End the session and go to the login screen
    pub fn logout(&self) -> Route {
        self.session.logout();
        self.unmount();
        Route::Login
    }

    /// Stop applying results to this view
    pub fn unmount(&self) {
        self.state.dispose();
    }
}
