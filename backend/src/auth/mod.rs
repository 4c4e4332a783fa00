//! Authentication module: session resolution and route access control.
//!
//! This module provides the public interface for resolving who is behind a
//! request, the route guard middleware that gates server-rendered pages, and
//! the auth endpoints.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;

// Re-exports for convenience
pub use errors::*;
pub use handlers::extract_credentials;
pub use middleware::{classify, decide, route_guard};
pub use models::*;
pub use routes::*;
pub use service::*;
