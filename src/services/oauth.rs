// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth authorization-code flow.
//!
//! The authorization URL carries no `state` or PKCE parameter, so the
//! callback cannot tell a forged request from a real one.
// TODO: add a signed `state` parameter and verify it in `complete_exchange`.

use crate::config::Config;
use crate::db::Store;
use crate::error::AppError;
use crate::models::UserCredential;
use crate::services::google::{GoogleApi, GoogleApiError};
use crate::time_utils::format_utc_rfc3339;
use chrono::Utc;
use std::sync::Arc;

pub const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Scopes requested at consent time.
pub const GOOGLE_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/calendar.readonly",
    "https://www.googleapis.com/auth/userinfo.email",
];

/// Result of a completed OAuth callback.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthResult {
    pub email: String,
    /// Frontend URL to send the browser to
    pub redirect_to: String,
}

/// Builds the consent URL and finishes the code exchange.
#[derive(Clone)]
pub struct OAuthFlow {
    config: Config,
    store: Store,
    google: Arc<dyn GoogleApi>,
}

impl OAuthFlow {
    pub fn new(config: Config, store: Store, google: Arc<dyn GoogleApi>) -> Self {
        Self {
            config,
            store,
            google,
        }
    }

    /// Google consent URL requesting offline access.
    pub fn build_authorization_url(&self) -> Result<String, AppError> {
        if !self.config.oauth_configured() {
            tracing::error!("Login attempted without a configured Google client ID");
            return Err(AppError::OAuthNotConfigured);
        }

        let scope = GOOGLE_SCOPES.join(" ");
        let params = [
            ("client_id", self.config.google_client_id.as_str()),
            ("redirect_uri", self.config.google_redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ];

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(format!("{}?{}", GOOGLE_AUTH_URI, query))
    }

    /// Exchange `code` for tokens, identify the user, and store the tokens.
    ///
    /// The stored token bundle is replaced wholesale. Nothing is written if
    /// any step before the upsert fails.
    pub async fn complete_exchange(&self, code: &str) -> Result<OAuthResult, AppError> {
        tracing::info!("Exchanging authorization code for tokens");

        let tokens = self
            .google
            .exchange_code(code)
            .await
            .map_err(|e| match e {
                GoogleApiError::Status { status, body } => {
                    tracing::error!(status, body = %body, "Google token exchange failed");
                    AppError::TokenExchangeFailed
                }
                other => {
                    tracing::error!(error = %other, "OAuth callback error");
                    AppError::ExchangeError(other.to_string())
                }
            })?;

        let user_info = self
            .google
            .fetch_user_info(&tokens.access_token)
            .await
            .map_err(|e| match e {
                GoogleApiError::Status { status, body } => {
                    tracing::error!(status, body = %body, "Google userinfo lookup failed");
                    AppError::UserInfoFailed
                }
                other => {
                    tracing::error!(error = %other, "OAuth callback error");
                    AppError::ExchangeError(other.to_string())
                }
            })?;

        let email = user_info.email.filter(|e| !e.is_empty()).ok_or_else(|| {
            AppError::ExchangeError("userinfo response has no email".to_string())
        })?;

        let now = Utc::now();
        let credential = UserCredential {
            email: email.clone(),
            google_tokens: Some(tokens.with_expiry_from(now)),
            updated_at: format_utc_rfc3339(now),
        };

        self.store
            .upsert_credential(&credential)
            .await
            .map_err(|e| {
                tracing::error!(email = %email, error = %e, "Failed to store Google tokens");
                AppError::ExchangeError(e.to_string())
            })?;

        tracing::info!(email = %email, "OAuth successful, tokens stored");

        Ok(OAuthResult {
            redirect_to: self.redirect_target(&email),
            email,
        })
    }

    /// Frontend landing URL after a successful login.
    pub fn redirect_target(&self, email: &str) -> String {
        let frontend = match self.config.cors_origins.first() {
            Some(origin) if origin != "*" => origin.as_str(),
            _ => self.config.frontend_url.as_str(),
        };

        format!(
            "{}/?email={}&auth=success",
            frontend.trim_end_matches('/'),
            urlencoding::encode(email)
        )
    }
}
