//! Central module for organizing the application's API endpoints.
//!
//! Everything under `/api` bypasses the route guard and authorizes itself.
//! Auth endpoints are registered by the `auth` module.

pub mod user;

use axum::routing::get;
use axum::Router;

use crate::AppState;

async fn health() -> &'static str {
    "ok"
}

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/user/profile", get(user::handlers::get_profile))
}
