//! Session Store
//!
//! Holds the credential and member identity in memory and mirrors both to a
//! key/value store. Each operation updates memory and storage while holding
//! the same write lock, so within a process the two copies never disagree.
//! Storage failures are logged and never reach the caller: the worst outcome
//! is an unauthenticated session.

use crate::api::Member;
use crate::session::{AUTH_MEMBER_KEY, AUTH_TOKEN_KEY};
use crate::storage::{KeyValueStore, StorageResult};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Snapshot of the current session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub member: Option<Member>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// In-memory session mirrored to persistent storage
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<Session>,
}

impl SessionStore {
    /// Restore the session persisted in `storage`
    ///
    /// Any read or parse failure yields an empty session.
    pub fn hydrate(storage: Arc<dyn KeyValueStore>) -> Self {
        let session = match Self::read_persisted(storage.as_ref()) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read session from storage");
                Session::default()
            }
        };

        tracing::debug!(
            authenticated = session.is_authenticated(),
            "Session hydrated"
        );

        Self {
            storage,
            state: RwLock::new(session),
        }
    }

    fn read_persisted(storage: &dyn KeyValueStore) -> StorageResult<Session> {
        let token = storage
            .get_item(AUTH_TOKEN_KEY)?
            .filter(|token| !token.is_empty());

        // An empty value counts as no member
        let member = match storage.get_item(AUTH_MEMBER_KEY)?.filter(|raw| !raw.is_empty()) {
            Some(raw) => Some(serde_json::from_str::<Member>(&raw)?),
            None => None,
        };

        Ok(Session { token, member })
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Current credential
    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    /// Current member identity
    pub fn member(&self) -> Option<Member> {
        self.read().member.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// Start a session with a fresh credential
    pub fn login(&self, token: impl Into<String>, member: Option<Member>) {
        let token = token.into();
        let mut state = self.write();

        if let Err(e) = self.persist(&token, member.as_ref()) {
            tracing::error!(error = %e, "Failed to persist session");
        }

        tracing::info!(
            member = member.as_ref().map(|m| m.username.as_str()).unwrap_or("-"),
            "Logged in"
        );

        state.token = Some(token);
        state.member = member;
    }

    /// End the session
    pub fn logout(&self) {
        let mut state = self.write();

        let removed = self
            .storage
            .remove_item(AUTH_TOKEN_KEY)
            .and_then(|_| self.storage.remove_item(AUTH_MEMBER_KEY));
        if let Err(e) = removed {
            tracing::error!(error = %e, "Failed to remove session from storage");
        }

        tracing::info!("Logged out");

        state.token = None;
        state.member = None;
    }

    /// Replace the member identity, keeping the credential
    pub fn update_member(&self, member: Option<Member>) {
        let mut state = self.write();

        if let Err(e) = self.persist_member(member.as_ref()) {
            tracing::error!(error = %e, "Failed to update member in storage");
        }

        state.member = member;
    }

    fn persist(&self, token: &str, member: Option<&Member>) -> StorageResult<()> {
        self.storage.set_item(AUTH_TOKEN_KEY, token)?;
        self.persist_member(member)
    }

    fn persist_member(&self, member: Option<&Member>) -> StorageResult<()> {
        match member {
            Some(member) => {
                let raw = serde_json::to_string(member)?;
                self.storage.set_item(AUTH_MEMBER_KEY, &raw)
            }
            None => self.storage.remove_item(AUTH_MEMBER_KEY),
        }
    }
}
