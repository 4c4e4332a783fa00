//! Handler functions for user profile endpoints.
//!
//! API routes are skipped by the route guard, so each handler authorizes the
//! caller itself and answers with status codes rather than redirects.

use adapters::UserProfile;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::auth::extract_credentials;
use crate::errors::AppError;
use crate::AppState;

/// `GET /api/user/profile`
pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, AppError> {
    let credentials =
        extract_credentials(&headers, &state.session_cookie).ok_or(AppError::Unauthorized)?;

    let session =
        state.auth.current_session(&credentials).await?.ok_or(AppError::Unauthorized)?;
    let profile = state
        .auth
        .profile_for(session.user_id)
        .await?
        .ok_or(AppError::NotFound("profile"))?;
    Ok(Json(profile))
}
