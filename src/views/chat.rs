//! Chat view
//!
//! Shows the latest messages and keeps them fresh by polling:
//!
//! 1. `mount` loads the list once (`Loading` → ready, or an error line)
//! 2. a background task then re-fetches every poll interval and replaces
//!    the list wholesale; failed polls are dropped silently
//! 3. `send` posts a message and puts the server's copy at the head of the
//!    list without waiting for the next poll
//!
//! The optimistic head insert is not reconciled with polls: whichever
//! completes last wins, and a poll that started before the send finished
//! may briefly hide the new message until the following poll.

use crate::api::{ChatBackend, Member, Message, NewMessage};
use crate::app::App;
use crate::routes::Route;
use crate::session::SessionStore;
use crate::views::scope::ViewState;
use crate::views::validation::validate_message;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const LOAD_FAILED: &str = "Failed to load messages.";
const SEND_FAILED: &str = "Failed to send the message.";

/// Everything the chat screen shows
#[derive(Debug, Clone, PartialEq)]
pub struct ChatState {
    /// Newest first
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_sending: bool,
    pub send_error: Option<String>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            is_loading: true,
            error: None,
            is_sending: false,
            send_error: None,
        }
    }
}

/// Phase of the initial load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    Loading,
    Ready,
    Error,
}

impl ChatState {
    pub fn phase(&self) -> ChatPhase {
        if self.is_loading {
            ChatPhase::Loading
        } else if self.error.is_some() {
            ChatPhase::Error
        } else {
            ChatPhase::Ready
        }
    }
}

/// Group chat screen; clones share the same view
#[derive(Clone)]
pub struct ChatView {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn ChatBackend>,
    session: Arc<SessionStore>,
    state: Arc<ViewState<ChatState>>,
    poll_interval: Duration,
    limit: u32,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.state.dispose();
        if let Some(handle) = self.poller.get_mut().ok().and_then(Option::take) {
            handle.abort();
        }
    }
}

impl ChatView {
    pub fn new(app: &App) -> Self {
        let chat = &app.config().chat;

        Self {
            inner: Arc::new(Inner {
                backend: Arc::clone(app.backend()),
                session: Arc::clone(app.session()),
                state: ViewState::new(ChatState::default()),
                // A zero period would make tokio's interval panic
                poll_interval: Duration::from_secs(chat.poll_interval_secs.max(1)),
                limit: chat.message_limit,
                poller: Mutex::new(None),
            }),
        }
    }

    pub fn state(&self) -> ChatState {
        self.inner.state.get()
    }

    /// Receive a snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.inner.state.subscribe()
    }

    /// Identity shown in the header
    pub fn member(&self) -> Option<Member> {
        self.inner.session.member()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.state.is_alive()
    }

    /// Load the list once, then keep polling until unmounted
    pub async fn mount(&self) {
        self.load().await;
        self.start_polling();
    }

    /// Initial fetch
    async fn load(&self) {
        self.inner.state.update(|s| s.error = None);

        let result = self.inner.backend.fetch_messages(Some(self.inner.limit)).await;

        self.inner.state.update(|s| {
            match result {
                Ok(messages) => {
                    tracing::debug!(count = messages.len(), "Messages loaded");
                    s.messages = messages;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load messages");
                    s.error = Some(LOAD_FAILED.to_string());
                }
            }
            s.is_loading = false;
        });
    }

    fn start_polling(&self) {
        if !self.is_mounted() {
            return;
        }

        let mut poller = self.inner.poller.lock().unwrap_or_else(|e| e.into_inner());
        if poller.is_some() {
            return;
        }

        let backend = Arc::clone(&self.inner.backend);
        let state = Arc::clone(&self.inner.state);
        let period = self.inner.poll_interval;
        let limit = self.inner.limit;

        tracing::info!(interval_secs = period.as_secs(), "Starting message polling");

        *poller = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // Skip the first immediate tick
            ticker.tick().await;

            loop {
                ticker.tick().await;

                if !state.is_alive() {
                    break;
                }

                match backend.fetch_messages(Some(limit)).await {
                    Ok(messages) => {
                        let count = messages.len();
                        if !state.update(|s| s.messages = messages) {
                            break;
                        }
                        tracing::debug!(count, "Poll replaced messages");
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "Poll failed, waiting for next tick");
                    }
                }
            }

            tracing::debug!("Message polling stopped");
        }));
    }

    /// Post a message; whitespace-only text is rejected without a request
    pub async fn send(&self, text: &str) {
        let text = match validate_message(text) {
            Ok(text) => text.to_string(),
            Err(e) => {
                self.inner.state.update(|s| s.send_error = Some(e.to_string()));
                return;
            }
        };

        self.inner.state.update(|s| {
            s.send_error = None;
            s.is_sending = true;
        });

        let result = self.inner.backend.send_message(&NewMessage { text }).await;

        self.inner.state.update(|s| {
            match result {
                Ok(created) => s.messages.insert(0, created),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to send message");
                    s.send_error = Some(SEND_FAILED.to_string());
                }
            }
            s.is_sending = false;
        });
    }

    /// End the session and go to the login screen
    pub fn logout(&self) -> Route {
        self.unmount();
        self.inner.session.logout();
        Route::Login
    }

    /// Stop polling and ignore anything that completes from now on
    ///
    /// Requests already on the wire are not aborted.
    pub fn unmount(&self) {
        self.inner.state.dispose();

        let handle = self
            .inner
            .poller
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
            tracing::debug!("Chat view unmounted");
        }
    }
}
