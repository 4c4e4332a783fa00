//! Handler functions for authentication-related endpoints.
//!
//! Parses caller credentials out of request headers, answers the session
//! liveness endpoint clients poll, and serves the public auth pages.

use adapters::Credentials;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::AppState;

fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

fn parse_bearer(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = raw.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Session cookie first, then an `Authorization: Bearer` header.
pub fn extract_credentials(headers: &HeaderMap, cookie_name: &str) -> Option<Credentials> {
    parse_cookie(headers, cookie_name)
        .or_else(|| parse_bearer(headers))
        .map(Credentials::new)
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionStatus {
    fn inactive() -> Self {
        Self { active: false, user_id: None, expires_at: None }
    }
}

/// `GET /api/auth/session`. Absence is a normal answer; only a failed lookup
/// is an error.
pub async fn session_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionStatus>, AppError> {
    let Some(credentials) = extract_credentials(&headers, &state.session_cookie) else {
        return Ok(Json(SessionStatus::inactive()));
    };

    let status = match state.auth.current_session(&credentials).await? {
        Some(session) => SessionStatus {
            active: true,
            user_id: Some(session.user_id),
            expires_at: session.expires_at,
        },
        None => SessionStatus::inactive(),
    };
    Ok(Json(status))
}

pub async fn login_page() -> &'static str {
    "Sign in"
}

pub async fn register_page() -> &'static str {
    "Create an account"
}

pub async fn registration_success_page() -> &'static str {
    "Registration received"
}

pub async fn pending_approval_page() -> &'static str {
    "Your account is awaiting approval"
}
