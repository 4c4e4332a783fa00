//! Central module for application-wide configuration settings.
//!
//! This module loads the server's listen address, the managed backend's URL
//! and public key, the request timeout and the name of the session cookie
//! from the environment (and a `.env` file, when present).

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_SESSION_COOKIE: &str = "sb-access-token";
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Http,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub backend_mode: BackendMode,
    pub backend_url: Option<String>,
    pub backend_anon_key: Option<String>,
    pub backend_timeout: Duration,
    pub session_cookie: String,
}

impl AppConfig {
    /// Load from the process environment, after applying any `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get("QRCARD_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_raw
            .parse()
            .map_err(|_| ConfigError::Invalid { key: "QRCARD_BIND_ADDR", value: bind_raw.clone() })?;

        let backend_mode = match get("QRCARD_BACKEND_MODE").as_deref() {
            None | Some("http") => BackendMode::Http,
            Some("memory") => BackendMode::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "QRCARD_BACKEND_MODE",
                    value: other.to_string(),
                })
            }
        };

        let backend_url = get("QRCARD_BACKEND_URL");
        let backend_anon_key = get("QRCARD_BACKEND_ANON_KEY");
        if backend_mode == BackendMode::Http {
            if backend_url.is_none() {
                return Err(ConfigError::Missing("QRCARD_BACKEND_URL"));
            }
            if backend_anon_key.is_none() {
                return Err(ConfigError::Missing("QRCARD_BACKEND_ANON_KEY"));
            }
        }

        let backend_timeout = match get("QRCARD_BACKEND_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "QRCARD_BACKEND_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
        };

        let session_cookie =
            get("QRCARD_SESSION_COOKIE").unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());

        Ok(Self {
            bind_addr,
            backend_mode,
            backend_url,
            backend_anon_key,
            backend_timeout,
            session_cookie,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn memory_mode_needs_no_backend_settings() {
        let config = AppConfig::from_lookup(lookup(&[("QRCARD_BACKEND_MODE", "memory")])).unwrap();
        assert_eq!(config.backend_mode, BackendMode::Memory);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(config.session_cookie, DEFAULT_SESSION_COOKIE);
        assert_eq!(config.backend_timeout, Duration::from_secs(5));
    }

    #[test]
    fn http_mode_requires_url_and_key() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("QRCARD_BACKEND_URL")));

        let err = AppConfig::from_lookup(lookup(&[("QRCARD_BACKEND_URL", "https://x.example")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("QRCARD_BACKEND_ANON_KEY")));

        let config = AppConfig::from_lookup(lookup(&[
            ("QRCARD_BACKEND_URL", "https://x.example"),
            ("QRCARD_BACKEND_ANON_KEY", "anon"),
            ("QRCARD_BIND_ADDR", "0.0.0.0:8080"),
            ("QRCARD_BACKEND_TIMEOUT_SECS", "12"),
        ]))
        .unwrap();
        assert_eq!(config.backend_mode, BackendMode::Http);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.backend_timeout, Duration::from_secs(12));
    }

    #[test]
    fn rejects_garbage_values() {
        let err = AppConfig::from_lookup(lookup(&[
            ("QRCARD_BACKEND_MODE", "memory"),
            ("QRCARD_BIND_ADDR", "not-an-addr"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "QRCARD_BIND_ADDR", .. }));

        let err = AppConfig::from_lookup(lookup(&[
            ("QRCARD_BACKEND_MODE", "memory"),
            ("QRCARD_BACKEND_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "QRCARD_BACKEND_TIMEOUT_SECS", .. }));

        let err = AppConfig::from_lookup(lookup(&[("QRCARD_BACKEND_MODE", "sqlite")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "QRCARD_BACKEND_MODE", .. }));
    }
}
