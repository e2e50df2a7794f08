// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google access token lifecycle.

use crate::db::Store;
use crate::error::AppError;
use crate::models::credential::expiry_after;
use crate::models::ValidCredential;
use crate::services::google::GoogleApi;
use chrono::{Duration, Utc};
use std::sync::Arc;

/// Margin before token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Hands out usable access credentials, refreshing expired ones.
///
/// There is no per-user lock: two concurrent requests for the same user may
/// both refresh, and the later write wins.
#[derive(Clone)]
pub struct TokenManager {
    store: Store,
    google: Arc<dyn GoogleApi>,
}

impl TokenManager {
    pub fn new(store: Store, google: Arc<dyn GoogleApi>) -> Self {
        Self { store, google }
    }

    /// Get a valid credential for `email`.
    ///
    /// The store is written only when a refresh happens, and then only the
    /// access token field. The stored `expires_at` is not touched, so once a
    /// token has expired every later call refreshes again and costs one
    /// Google round trip plus one store write.
    ///
    /// Any failure after the refresh starts, including the store write, is
    /// reported as [`AppError::TokenRefreshFailed`].
    pub async fn resolve_credentials(&self, email: &str) -> Result<ValidCredential, AppError> {
        let tokens = self
            .store
            .get_credential(email)
            .await?
            .and_then(|c| c.google_tokens)
            .ok_or(AppError::Unauthenticated)?;

        let mut credential = ValidCredential::from(&tokens);

        let now = Utc::now();
        if !credential.is_expired(now, Duration::seconds(TOKEN_REFRESH_MARGIN_SECS)) {
            return Ok(credential);
        }

        let Some(refresh_token) = credential.refresh_token.clone() else {
            tracing::debug!(email, "Access token expired and no refresh token stored");
            return Ok(credential);
        };

        tracing::info!(email, "Access token expired, refreshing");

        let refreshed = self
            .google
            .refresh_access_token(&refresh_token)
            .await
            .map_err(|e| {
                tracing::error!(email, error = %e, "Token refresh failed");
                AppError::TokenRefreshFailed
            })?;

        self.store
            .set_access_token(email, &refreshed.access_token)
            .await
            .map_err(|e| {
                tracing::error!(email, error = %e, "Failed to persist refreshed token");
                AppError::TokenRefreshFailed
            })?;

        credential.access_token = refreshed.access_token;
        credential.expires_at = refreshed
            .expires_in
            .and_then(|secs| expiry_after(now, secs));

        tracing::info!(email, "Access token refreshed");
        Ok(credential)
    }
}
