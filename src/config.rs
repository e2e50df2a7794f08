// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup. A `.env` file next to the binary is
//! honored for local development.

use std::env;
use std::time::Duration;

/// Placeholder client ID shipped in the sample `.env`.
pub const PLACEHOLDER_CLIENT_ID: &str = "YOUR_GOOGLE_CLIENT_ID_HERE";

/// Which document store backs the credential and alarm collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Cloud Firestore (or the Firestore emulator).
    Firestore,
    /// Process-local store, lost on restart.
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Google OAuth ---
    /// OAuth client ID (empty when not configured)
    pub google_client_id: String,
    /// OAuth client secret
    pub google_client_secret: String,
    /// Redirect URI registered with Google
    pub google_redirect_uri: String,

    // --- Frontend / CORS ---
    /// Allowed frontend origins; `["*"]` means any origin
    pub cors_origins: Vec<String>,
    /// Redirect target used when `cors_origins` is a wildcard
    pub frontend_url: String,

    // --- Persistence ---
    pub store_backend: StoreBackend,
    /// GCP project hosting Firestore
    pub gcp_project_id: String,
    /// Firestore database name
    pub firestore_database: String,

    // --- Outbound HTTP ---
    /// Per-request timeout for calls to Google
    pub http_timeout: Duration,
    /// Retries for transient Google failures (0 disables)
    pub http_max_retries: u32,

    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "firestore".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "firestore" => StoreBackend::Firestore,
            "memory" => StoreBackend::Memory,
            _ => return Err(ConfigError::Invalid("STORE_BACKEND")),
        };

        let gcp_project_id = match store_backend {
            StoreBackend::Firestore => {
                env::var("GCP_PROJECT_ID").map_err(|_| ConfigError::Missing("GCP_PROJECT_ID"))?
            }
            StoreBackend::Memory => env::var("GCP_PROJECT_ID").unwrap_or_default(),
        };

        Ok(Self {
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            google_redirect_uri: env::var("GOOGLE_REDIRECT_URI").unwrap_or_default(),
            cors_origins: parse_origins(
                &env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            store_backend,
            gcp_project_id,
            firestore_database: env::var("FIRESTORE_DATABASE")
                .unwrap_or_else(|_| "(default)".to_string()),
            http_timeout: Duration::from_secs(parse_or("HTTP_TIMEOUT_SECS", 10)?),
            http_max_retries: parse_or("HTTP_MAX_RETRIES", 2)?,
            port: parse_or("PORT", 8080)?,
        })
    }

    /// Config for tests: memory store, configured OAuth client, one origin.
    pub fn test_default() -> Self {
        Self {
            google_client_id: "test_client_id".to_string(),
            google_client_secret: "test_secret".to_string(),
            google_redirect_uri: "http://localhost:8080/api/auth/google/callback".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
            frontend_url: "http://localhost:3000".to_string(),
            store_backend: StoreBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            firestore_database: "(default)".to_string(),
            http_timeout: Duration::from_secs(2),
            http_max_retries: 0,
            port: 8080,
        }
    }

    /// True when the OAuth client ID is set to something usable.
    pub fn oauth_configured(&self) -> bool {
        !self.google_client_id.is_empty() && self.google_client_id != PLACEHOLDER_CLIENT_ID
    }

    /// True when any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Split a comma separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("STORE_BACKEND", "memory");
        env::set_var("GOOGLE_CLIENT_ID", " test_id ");
        env::set_var("CORS_ORIGINS", "https://app.example.com/, http://localhost:3000");
        env::set_var("HTTP_MAX_RETRIES", "3");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.google_client_id, "test_id");
        assert_eq!(
            config.cors_origins,
            vec!["https://app.example.com", "http://localhost:3000"]
        );
        assert_eq!(config.http_max_retries, 3);
        assert!(config.oauth_configured());
    }

    #[test]
    fn test_parse_origins_wildcard() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert!(parse_origins(" , ").is_empty());
    }

    #[test]
    fn test_placeholder_client_id_not_configured() {
        let mut config = Config::test_default();
        config.google_client_id = PLACEHOLDER_CLIENT_ID.to_string();
        assert!(!config.oauth_configured());

        config.google_client_id.clear();
        assert!(!config.oauth_configured());
    }
}
