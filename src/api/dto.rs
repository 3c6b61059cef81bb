//! Data Transfer Objects
//!
//! Request and response types for the chat backend endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

// ============================================
// AUTH DTOs
// ============================================

/// Username/password pair sent to register and login
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Identity of the signed-in member
///
/// This is the record mirrored to storage; any extra fields the server
/// sends along (such as `created_at`) are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub username: String,
}

impl Member {
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// Login and registration response
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Opaque bearer credential
    pub token: String,
    /// Identity of the member, absent on some servers
    #[serde(default)]
    pub member: Option<Member>,
}

// ============================================
// PROFILE DTOs
// ============================================

/// Profile as returned by `GET`/`PUT /api/auth/profile`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    /// Registration time (ISO 8601)
    #[serde(default)]
    pub created_at: String,
}

impl Profile {
    /// The identity part of the profile
    pub fn member(&self) -> Member {
        Member::new(self.id, self.username.clone())
    }
}

/// Profile update request
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub username: String,
}

// ============================================
// CHAT DTOs
// ============================================

/// A chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub author_username: String,
    pub text: String,
    /// Creation time (ISO 8601)
    #[serde(default)]
    pub created_at: String,
}

/// New message request
#[derive(Debug, Clone, Serialize)]
pub struct NewMessage {
    pub text: String,
}

/// Query parameters for the message list
#[derive(Debug, Clone, Serialize)]
pub(crate) struct MessageListParams {
    pub limit: u32,
}
