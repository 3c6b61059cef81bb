//! Client Session
//!
//! The credential and member identity of the signed-in user, kept in memory
//! and mirrored to key/value storage under two keys:
//!
//! - [`AUTH_TOKEN_KEY`]: the raw credential string
//! - [`AUTH_MEMBER_KEY`]: the member serialized as JSON

mod store;

pub use store::{Session, SessionStore};

/// Storage key of the raw credential
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Storage key of the serialized member
pub const AUTH_MEMBER_KEY: &str = "auth_member";
