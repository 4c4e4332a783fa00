//! Defines the HTTP routes specifically for authentication.
//!
//! The public auth pages live at the top level; the session liveness
//! endpoint is nested under the API prefix so the route guard leaves it to
//! its own handler.

use axum::routing::get;
use axum::Router;

use super::handlers::{
    login_page, pending_approval_page, register_page, registration_success_page, session_status,
};
use crate::AppState;

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page))
        .route("/auth/register", get(register_page))
        .route("/auth/registration-success", get(registration_success_page))
        .route("/auth/pending-approval", get(pending_approval_page))
        .route("/api/auth/session", get(session_status))
}
