//! Module for user profile API endpoints.
//!
//! Exposes the caller's own profile (role and approval status) to client
//! code, separately from the auth session endpoint.

pub mod handlers;
