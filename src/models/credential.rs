// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stored Google credentials.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Credential document stored in the `users` collection, keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCredential {
    /// Google account email (also used as document ID)
    pub email: String,
    /// Token bundle from the last OAuth exchange
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_tokens: Option<GoogleTokens>,
    /// Last write from the OAuth callback (ISO 8601)
    pub updated_at: String,
}

/// Token bundle as returned by Google's token endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleTokens {
    pub access_token: String,
    /// Only present when consent was granted with `access_type=offline`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds at issue time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Absolute expiry (ISO 8601), derived from `expires_in` when stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    /// Space separated granted scopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl GoogleTokens {
    /// Fill in `expires_at` relative to `issued_at` if the provider gave a lifetime.
    pub fn with_expiry_from(mut self, issued_at: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self
                .expires_in
                .and_then(|secs| expiry_after(issued_at, secs))
                .map(crate::time_utils::format_utc_rfc3339);
        }
        self
    }

    /// Parsed `expires_at`. Unparseable values are treated as absent.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        let raw = self.expires_at.as_deref()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(error = %e, expires_at = raw, "Ignoring unparseable token expiry");
                None
            }
        }
    }

    /// Granted scopes as a list.
    pub fn scopes(&self) -> Vec<String> {
        self.scope
            .as_deref()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// `issued_at + lifetime_secs`, or `None` if the lifetime is out of range.
pub fn expiry_after(issued_at: DateTime<Utc>, lifetime_secs: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(lifetime_secs).and_then(|d| issued_at.checked_add_signed(d))
}

/// Access credential ready for use against Google APIs.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCredential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scopes: Vec<String>,
}

impl ValidCredential {
    /// Whether the access token is expired (or within `margin` of expiring).
    ///
    /// A credential without an expiry never counts as expired.
    pub fn is_expired(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.expires_at.is_some_and(|exp| now + margin >= exp)
    }
}

impl From<&GoogleTokens> for ValidCredential {
    fn from(tokens: &GoogleTokens) -> Self {
        Self {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at: tokens.expiry(),
            scopes: tokens.scopes(),
        }
    }
}
