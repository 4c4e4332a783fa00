//! Custom error types specific to the `adapters` crate.
//!
//! This module defines errors that can occur while talking to the managed
//! backend: transport failures, unexpected HTTP statuses and undecodable
//! payloads. "No session" and "no profile" are not errors; adapters report
//! those as `Ok(None)`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode backend response: {0}")]
    Decode(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl AdapterError {
    /// Whether the failure is likely to clear up on its own (network or 5xx).
    pub fn is_transient(&self) -> bool {
        match self {
            AdapterError::Transport(_) | AdapterError::Unavailable(_) => true,
            AdapterError::Status { status, .. } => *status >= 500,
            AdapterError::Decode(_) => false,
        }
    }
}
