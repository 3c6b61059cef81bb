//! In-memory backend used by the view tests

use crate::api::{
    ApiError, ApiResult, AuthResponse, ChatBackend, Credentials, ErrorBody, Member, Message,
    NewMessage, Profile, ProfileUpdate,
};
use crate::app::App;
use crate::config::Config;
use crate::storage::MemoryStore;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Either a value or a `(status, body)` rejection
pub(crate) type Reply<T> = Result<T, (u16, Value)>;

fn answer<T: Clone>(reply: &Mutex<Reply<T>>) -> ApiResult<T> {
    reply
        .lock()
        .unwrap()
        .clone()
        .map_err(|(status, body)| ApiError::Rejected {
            status,
            body: ErrorBody::from_value(body),
        })
}

pub(crate) fn message(id: i64, text: &str) -> Message {
    Message {
        id,
        author_username: "a".to_string(),
        text: text.to_string(),
        created_at: "2024-01-01T12:00:00Z".to_string(),
    }
}

pub(crate) fn profile(id: i64, username: &str) -> Profile {
    Profile {
        id,
        username: username.to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

pub(crate) struct FakeBackend {
    pub auth: Mutex<Reply<AuthResponse>>,
    pub profile: Mutex<Reply<Profile>>,
    pub updated: Mutex<Reply<Profile>>,
    pub messages: Mutex<Reply<Vec<Message>>>,
    pub sent: Mutex<Reply<Message>>,
    /// Latency of every call
    pub delay: Mutex<Duration>,
    /// Names of the calls made, in order
    pub calls: Mutex<Vec<String>>,
    pub last_credentials: Mutex<Option<Credentials>>,
    pub last_update: Mutex<Option<ProfileUpdate>>,
    pub sent_texts: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            auth: Mutex::new(Ok(AuthResponse {
                token: "T1".to_string(),
                member: Some(Member::new(1, "a")),
            })),
            profile: Mutex::new(Ok(profile(1, "a"))),
            updated: Mutex::new(Ok(profile(1, "a"))),
            messages: Mutex::new(Ok(Vec::new())),
            sent: Mutex::new(Ok(message(100, "sent"))),
            delay: Mutex::new(Duration::ZERO),
            calls: Mutex::new(Vec::new()),
            last_credentials: Mutex::new(None),
            last_update: Mutex::new(None),
            sent_texts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    async fn enter(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn register(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        *self.last_credentials.lock().unwrap() = Some(credentials.clone());
        self.enter("register").await;
        answer(&self.auth)
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        *self.last_credentials.lock().unwrap() = Some(credentials.clone());
        self.enter("login").await;
        answer(&self.auth)
    }

    async fn get_profile(&self) -> ApiResult<Profile> {
        self.enter("get_profile").await;
        answer(&self.profile)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Profile> {
        *self.last_update.lock().unwrap() = Some(update.clone());
        self.enter("update_profile").await;
        answer(&self.updated)
    }

    async fn fetch_messages(&self, _limit: Option<u32>) -> ApiResult<Vec<Message>> {
        self.enter("fetch_messages").await;
        answer(&self.messages)
    }

    async fn send_message(&self, message: &NewMessage) -> ApiResult<Message> {
        self.sent_texts.lock().unwrap().push(message.text.clone());
        self.enter("send_message").await;
        answer(&self.sent)
    }
}

/// App over an in-memory store and `backend`
pub(crate) fn app_with(backend: Arc<FakeBackend>) -> App {
    App::with_backend(Config::default(), Arc::new(MemoryStore::new()), backend)
}
