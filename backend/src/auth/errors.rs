//! Custom error types specific to authentication failures.
//!
//! A missing session or profile is not an error here; the service reports
//! those as `Ok(None)`. `AuthError` only covers lookups that could not be
//! completed, which callers must not confuse with "logged out".

use adapters::AdapterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity lookup failed: {0}")]
    Backend(#[from] AdapterError),
}
