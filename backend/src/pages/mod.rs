//! Placeholder page handlers for the server-rendered areas.
//!
//! Rendering lives in the front end; these exist so guarded navigation has a
//! target to forward to.

use axum::extract::Path;
use axum::routing::get;
use axum::Router;

use crate::AppState;

async fn home() -> &'static str {
    "QR business cards"
}

async fn dashboard() -> &'static str {
    "Dashboard"
}

async fn dashboard_section(Path(rest): Path<String>) -> String {
    format!("Dashboard: {rest}")
}

async fn admin() -> &'static str {
    "Admin"
}

async fn admin_section(Path(rest): Path<String>) -> String {
    format!("Admin: {rest}")
}

pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/{*rest}", get(dashboard_section))
        .route("/admin", get(admin))
        .route("/admin/{*rest}", get(admin_section))
}
