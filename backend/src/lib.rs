//! QR-card platform web backend.
//!
//! Builds the Axum application: the route guard wrapped around every page,
//! the auth and user APIs, and request tracing. The backend-as-a-service
//! client is constructed once at startup and injected through `AppState`.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod pages;
pub mod services;

use std::sync::Arc;

use adapters::{HttpBackendConfig, HttpSessionBackend, MemorySessionBackend, SessionBackend};
use axum::Router;

use crate::auth::AuthService;
use crate::config::{AppConfig, BackendMode, ConfigError};
use crate::errors::AppError;

/// Shared state injected into handlers and the route guard.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub session_cookie: String,
}

impl AppState {
    pub fn new(backend: Arc<dyn SessionBackend>, session_cookie: impl Into<String>) -> Self {
        Self { auth: AuthService::new(backend), session_cookie: session_cookie.into() }
    }
}

/// Construct the backend client selected by `config`.
pub fn connect_backend(config: &AppConfig) -> Result<Arc<dyn SessionBackend>, AppError> {
    match config.backend_mode {
        BackendMode::Memory => Ok(Arc::new(MemorySessionBackend::new())),
        BackendMode::Http => {
            let base_url =
                config.backend_url.clone().ok_or(ConfigError::Missing("QRCARD_BACKEND_URL"))?;
            let anon_key = config
                .backend_anon_key
                .clone()
                .ok_or(ConfigError::Missing("QRCARD_BACKEND_ANON_KEY"))?;
            let backend = HttpSessionBackend::new(HttpBackendConfig {
                base_url,
                anon_key,
                timeout: config.backend_timeout,
            })
            .map_err(|err| AppError::Auth(err.into()))?;
            Ok(Arc::new(backend))
        }
    }
}

async fn not_found() -> AppError {
    AppError::NotFound("page")
}

/// The fallback is registered before the layers so unknown paths are
/// guarded too.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(pages::pages_router())
        .merge(auth::auth_router())
        .merge(api::api_router())
        .fallback(not_found)
        .layer(axum::middleware::from_fn_with_state(state.clone(), auth::route_guard))
        .layer(middleware::trace_layer())
        .with_state(state)
}
