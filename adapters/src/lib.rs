//! Core `adapters` crate for abstracting the managed backend.
//!
//! This crate defines the `SessionBackend` trait, the two read-only queries
//! the access-control layer needs from the backend-as-a-service ("who owns
//! this session" and "what is this user's profile"), and provides the
//! concrete implementations: an HTTP client for the hosted backend and an
//! in-memory store for local runs and tests.

pub mod errors;
pub mod http;
pub mod memory;
pub mod models;

use async_trait::async_trait;
use uuid::Uuid;

pub use errors::AdapterError;
pub use http::{HttpBackendConfig, HttpSessionBackend};
pub use memory::MemorySessionBackend;
pub use models::{Credentials, ProfileStatus, Role, SessionInfo, UserProfile};

/// Read-only view of the backend's session store and profile table.
///
/// Implementations return `Ok(None)` when the thing simply does not exist
/// (logged out, expired, no profile row) and `Err` only when the lookup
/// itself could not be completed.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Resolve the session behind `credentials`.
    async fn get_session(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<SessionInfo>, AdapterError>;

    /// Fetch the profile row for `user_id`.
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AdapterError>;
}
