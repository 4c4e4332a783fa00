//! Core business logic for the authentication system.
//!
//! The service turns caller credentials into an `Identity` by asking the
//! managed backend for the session and then for the profile behind it. It
//! holds the injected backend client; there is no process-wide client.

use std::sync::Arc;

use adapters::{Credentials, SessionBackend, SessionInfo, UserProfile};
use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::errors::AuthError;
use super::models::Identity;

#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn SessionBackend>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self { backend }
    }

    /// The live session behind `credentials`, if any. Expired sessions are
    /// reported as absent even if the backend still returns them.
    pub async fn current_session(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<SessionInfo>, AuthError> {
        let session = self.backend.get_session(credentials).await?;
        Ok(session.filter(|s| !s.is_expired_at(Utc::now())))
    }

    /// The profile row of an already resolved session owner.
    pub async fn profile_for(&self, user_id: Uuid) -> Result<Option<UserProfile>, AuthError> {
        Ok(self.backend.get_profile(user_id).await?)
    }

    /// Session lookup followed by role lookup. A session without a profile
    /// row does not count as an identity.
    pub async fn resolve_identity(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<Identity>, AuthError> {
        let Some(session) = self.current_session(credentials).await? else {
            debug!("no live session for presented credentials");
            return Ok(None);
        };

        match self.profile_for(session.user_id).await? {
            Some(profile) => Ok(Some(Identity { user_id: session.user_id, role: profile.role })),
            None => {
                warn!(user_id = %session.user_id, "session has no profile row");
                Ok(None)
            }
        }
    }
}
