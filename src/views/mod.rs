//! Views
//!
//! Screen logic of the client, independent of how it is rendered:
//!
//! - **auth**: Login and registration forms
//! - **chat**: Message list with background polling and sending
//! - **profile**: Profile display and rename
//! - **validation**: Checks run before any request is made
//! - **format**: Timestamp display helpers
//!
//! Views that outlive a single call (chat, profile) publish their state
//! through a `tokio::sync::watch` channel. Once unmounted they stop applying
//! results, including responses to requests that were already in flight.

pub mod auth;
pub mod chat;
pub mod format;
pub mod profile;
pub mod validation;

pub(crate) mod scope;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{LoginForm, RegisterForm};
pub use chat::{ChatPhase, ChatState, ChatView};
pub use format::{format_date_time, format_time};
pub use profile::{ProfileState, ProfileView};
pub use validation::ValidationError;
