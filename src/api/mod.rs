//! Chat Backend API
//!
//! Client side of the chat service REST API.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /api/auth/register` - Create an account, returns `{token, member}`
//! - `POST /api/auth/login` - Sign in, returns `{token, member}`
//! - `GET /api/auth/profile` - Current profile
//! - `PUT /api/auth/profile` - Rename the current member
//!
//! ## Chat
//! - `GET /api/chat/messages?limit=N` - Latest messages, newest first
//! - `POST /api/chat/messages` - Post a message
//!
//! Requests carry `Authorization: Token <credential>` whenever a credential
//! is stored. Each call is a single attempt; callers decide what to do with
//! a failure.

pub mod client;
pub mod dto;
pub mod error;

pub use client::{ApiClient, AUTH_SCHEME};
pub use dto::{AuthResponse, Credentials, Member, Message, NewMessage, Profile, ProfileUpdate};
pub use error::{ApiError, ApiResult, ErrorBody};

use async_trait::async_trait;

/// Operations the views need from the chat backend
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Create an account
    async fn register(&self, credentials: &Credentials) -> ApiResult<AuthResponse>;

    /// Exchange username and password for a credential
    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse>;

    /// Profile of the signed-in member
    async fn get_profile(&self) -> ApiResult<Profile>;

    /// Replace the profile of the signed-in member
    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Profile>;

    /// Latest messages; `limit` is only sent when positive
    async fn fetch_messages(&self, limit: Option<u32>) -> ApiResult<Vec<Message>>;

    /// Post a message and return it as stored by the server
    async fn send_message(&self, message: &NewMessage) -> ApiResult<Message>;
}
