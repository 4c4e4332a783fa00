//! In-memory adapter used for local runs and tests.
//!
//! Holds token -> session and user id -> profile maps behind a lock, and can
//! be switched into a failing mode to simulate the backend being unreachable.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::errors::AdapterError;
use crate::models::{Credentials, ProfileStatus, Role, SessionInfo, UserProfile};
use crate::SessionBackend;

#[derive(Default)]
pub struct MemorySessionBackend {
    sessions: RwLock<HashMap<String, SessionInfo>>,
    profiles: RwLock<HashMap<Uuid, UserProfile>>,
    failing: AtomicBool,
    session_lookups: AtomicUsize,
}

impl MemorySessionBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with `role` and a live, non-expiring session for
    /// `token`. Returns the new user's id.
    pub fn sign_in(&self, token: &str, role: Role) -> Uuid {
        let user_id = Uuid::new_v4();
        self.insert_profile(UserProfile { id: user_id, role, status: ProfileStatus::Approved });
        self.insert_session(token, SessionInfo { user_id, expires_at: None });
        user_id
    }

    /// Replaces any session previously stored under `token`.
    pub fn insert_session(&self, token: &str, session: SessionInfo) {
        self.sessions.write().insert(token.to_string(), session);
    }

    pub fn insert_profile(&self, profile: UserProfile) {
        self.profiles.write().insert(profile.id, profile);
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.write().remove(token).is_some()
    }

    /// While set, every lookup fails with `AdapterError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `get_session` calls served so far, failed ones included.
    pub fn session_lookups(&self) -> usize {
        self.session_lookups.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), AdapterError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AdapterError::Unavailable("memory backend switched off".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionBackend for MemorySessionBackend {
    async fn get_session(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<SessionInfo>, AdapterError> {
        self.session_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let session = self.sessions.read().get(credentials.token()).cloned();
        Ok(session.filter(|s| !s.is_expired_at(Utc::now())))
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AdapterError> {
        self.check_available()?;
        Ok(self.profiles.read().get(&user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn signed_in_token_resolves_to_profile() {
        let backend = MemorySessionBackend::new();
        let user_id = backend.sign_in("tok", Role::Admin);

        let session = backend.get_session(&Credentials::new("tok")).await.unwrap().unwrap();
        assert_eq!(session.user_id, user_id);

        let profile = backend.get_profile(user_id).await.unwrap().unwrap();
        assert!(profile.role.is_admin());
    }

    #[tokio::test]
    async fn expired_and_revoked_sessions_are_absent() {
        let backend = MemorySessionBackend::new();
        let user_id = Uuid::new_v4();
        backend.insert_session(
            "old",
            SessionInfo { user_id, expires_at: Some(Utc::now() - Duration::minutes(1)) },
        );
        assert!(backend.get_session(&Credentials::new("old")).await.unwrap().is_none());

        backend.sign_in("live", Role::Member("user".into()));
        assert!(backend.revoke("live"));
        assert!(backend.get_session(&Credentials::new("live")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failing_mode_surfaces_errors() {
        let backend = MemorySessionBackend::new();
        let user_id = backend.sign_in("tok", Role::Admin);
        backend.set_failing(true);

        assert!(backend.get_session(&Credentials::new("tok")).await.is_err());
        assert!(backend.get_profile(user_id).await.is_err());
        assert_eq!(backend.session_lookups(), 1);

        backend.set_failing(false);
        assert!(backend.get_session(&Credentials::new("tok")).await.unwrap().is_some());
    }
}
