//! HTTP adapter for the hosted backend-as-a-service.
//!
//! Talks to the backend's auth endpoint (`/auth/v1/user`) to resolve a
//! session and to its REST endpoint (`/rest/v1/profiles`) to read profiles.
//! Every request carries the project's public `apikey` plus the caller's
//! bearer token, so row-level security on the backend still applies.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AdapterError;
use crate::models::{Credentials, SessionInfo, UserProfile};
use crate::SessionBackend;

#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Base URL of the backend project, without a trailing slash.
    pub base_url: String,
    pub anon_key: String,
    pub timeout: Duration,
}

/// Payload of `GET /auth/v1/user`. Only the fields the guard needs.
#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

pub struct HttpSessionBackend {
    client: Client,
    config: HttpBackendConfig,
}

impl HttpSessionBackend {
    pub fn new(mut config: HttpBackendConfig) -> Result<Self, AdapterError> {
        while config.base_url.ends_with('/') {
            config.base_url.pop();
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn user_url(&self) -> String {
        format!("{}/auth/v1/user", self.config.base_url)
    }

    fn profile_url(&self, user_id: Uuid) -> String {
        format!(
            "{}/rest/v1/profiles?id=eq.{}&select=id,role,status",
            self.config.base_url, user_id
        )
    }

    async fn error_from(response: reqwest::Response) -> AdapterError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        AdapterError::Status { status, body }
    }
}

#[async_trait]
impl SessionBackend for HttpSessionBackend {
    async fn get_session(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<SessionInfo>, AdapterError> {
        let response = self
            .client
            .get(self.user_url())
            .header("apikey", &self.config.anon_key)
            .bearer_auth(credentials.token())
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let user: AuthUser = response
                    .json()
                    .await
                    .map_err(|err| AdapterError::Decode(err.to_string()))?;
                Ok(Some(SessionInfo { user_id: user.id, expires_at: user.expires_at }))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("backend rejected access token");
                Ok(None)
            }
            _ => Err(Self::error_from(response).await),
        }
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AdapterError> {
        // Profiles are read with the anon key; RLS on the table decides visibility.
        let response = self
            .client
            .get(self.profile_url(user_id))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let rows: Vec<UserProfile> = response
            .json()
            .await
            .map_err(|err| AdapterError::Decode(err.to_string()))?;
        Ok(rows.into_iter().next())
    }
}
