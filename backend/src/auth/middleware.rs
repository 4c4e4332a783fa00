//! Middleware for protecting server-rendered routes.
//!
//! The route guard runs on every request. Reserved asset paths, the public
//! allow-list and API routes pass straight through (API handlers do their own
//! authorization). Everything else needs a resolvable session; admins are
//! kept out of the member dashboard and members out of the admin area.
//! Lookup failures fail closed to the login page.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::{debug, info, warn};

use super::handlers::extract_credentials;
use super::models::{
    Destination, GuardDecision, Identity, PathClass, ADMIN_PREFIX, API_PREFIX, DASHBOARD_PREFIX,
    PUBLIC_PATHS, RESERVED_PREFIXES,
};
use crate::AppState;

/// `path` is `prefix` itself or lies below it. `/administrator` is not
/// under `/admin`.
pub fn is_under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Bypass rules, in precedence order.
pub fn classify(path: &str) -> PathClass {
    if RESERVED_PREFIXES.iter().any(|prefix| is_under(path, prefix)) {
        return PathClass::Reserved;
    }
    let normalized = trim_trailing_slash(path);
    if PUBLIC_PATHS.iter().any(|public| *public == normalized) {
        return PathClass::Public;
    }
    if is_under(path, API_PREFIX) {
        return PathClass::Api;
    }
    PathClass::Protected
}

/// The whole guard policy for one request, given whatever identity could be
/// resolved for it.
pub fn decide(path: &str, identity: Option<&Identity>) -> GuardDecision {
    if classify(path) != PathClass::Protected {
        return GuardDecision::Forward;
    }
    match identity {
        None => GuardDecision::Redirect(Destination::Login),
        Some(id) if id.is_admin() && is_under(path, DASHBOARD_PREFIX) => {
            GuardDecision::Redirect(Destination::Admin)
        }
        Some(id) if !id.is_admin() && is_under(path, ADMIN_PREFIX) => {
            GuardDecision::Redirect(Destination::Dashboard)
        }
        Some(_) => GuardDecision::Forward,
    }
}

pub async fn route_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    let class = classify(&path);
    if class != PathClass::Protected {
        debug!(path = %path, ?class, "route guard bypass");
        return next.run(request).await;
    }

    let identity = match extract_credentials(request.headers(), &state.session_cookie) {
        None => None,
        Some(credentials) => match state.auth.resolve_identity(&credentials).await {
            Ok(identity) => identity,
            Err(err) => {
                warn!(path = %path, error = %err, "identity lookup failed, sending to login");
                None
            }
        },
    };

    match decide(&path, identity.as_ref()) {
        GuardDecision::Forward => next.run(request).await,
        GuardDecision::Redirect(destination) => {
            info!(
                path = %path,
                to = destination.path(),
                user_id = ?identity.as_ref().map(|id| id.user_id),
                "route guard redirect"
            );
            Redirect::temporary(destination.path()).into_response()
        }
    }
}
