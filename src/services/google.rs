// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth and Calendar API client.
//!
//! [`GoogleApi`] is the seam every component talks to. [`GoogleClient`] is
//! the reqwest implementation: each request has a client-wide timeout, and
//! idempotent calls go through [`send_with_retry`]. The authorization code
//! exchange is sent once since Google accepts each code only once.

use crate::config::Config;
use crate::error::AppError;
use crate::models::GoogleTokens;
use crate::services::retry::{send_with_retry, RetryPolicy};
use crate::time_utils::format_utc_rfc3339;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URI: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
pub const GOOGLE_CALENDAR_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Errors from outbound Google calls, before mapping to [`AppError`].
#[derive(Debug, thiserror::Error)]
pub enum GoogleApiError {
    #[error("Request to Google failed: {0}")]
    Transport(String),

    #[error("Google returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response from Google: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GoogleApiError {
    fn from(e: reqwest::Error) -> Self {
        GoogleApiError::Transport(e.to_string())
    }
}

/// Outbound operations against Google.
#[async_trait]
pub trait GoogleApi: Send + Sync {
    /// Exchange an authorization code for a token bundle.
    async fn exchange_code(&self, code: &str) -> Result<GoogleTokens, GoogleApiError>;

    /// Get a fresh access token using a refresh token.
    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<RefreshedToken, GoogleApiError>;

    /// Resolve the account behind an access token.
    async fn fetch_user_info(&self, access_token: &str) -> Result<UserInfo, GoogleApiError>;

    /// List events of one calendar.
    async fn list_events(
        &self,
        access_token: &str,
        query: &EventQuery,
    ) -> Result<Vec<ApiEvent>, GoogleApiError>;
}

/// Token endpoint response for `grant_type=refresh_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshedToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Subset of the userinfo response we rely on.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub email: Option<String>,
}

/// Parameters for an events listing.
#[derive(Debug, Clone)]
pub struct EventQuery {
    pub calendar_id: String,
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub max_results: u32,
}

/// Google Calendar API event (only the fields we read).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    #[serde(default)]
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub html_link: Option<String>,
    pub start: Option<ApiEventTime>,
    pub end: Option<ApiEventTime>,
}

/// Start or end of an event: `dateTime` for timed events, `date` for all-day.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
}

/// Where the client sends requests. Overridden in tests.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub token_uri: String,
    pub userinfo_uri: String,
    pub calendar_base: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            token_uri: GOOGLE_TOKEN_URI.to_string(),
            userinfo_uri: GOOGLE_USERINFO_URI.to_string(),
            calendar_base: GOOGLE_CALENDAR_BASE.to_string(),
        }
    }
}

/// reqwest-backed [`GoogleApi`].
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    endpoints: GoogleEndpoints,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    retry: RetryPolicy,
}

impl GoogleClient {
    /// Create a client for Google's production endpoints.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Self::with_endpoints(
            config,
            GoogleEndpoints::default(),
            RetryPolicy::with_max_retries(config.http_max_retries),
        )
    }

    /// Create a client against arbitrary endpoints.
    pub fn with_endpoints(
        config: &Config,
        endpoints: GoogleEndpoints,
        retry: RetryPolicy,
    ) -> Result<Self, AppError> {
        Ok(Self {
            http: build_http_client(config.http_timeout)?,
            endpoints,
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.google_redirect_uri.clone(),
            retry,
        })
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, GoogleApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                tracing::warn!("Google quota/rate limit hit (429)");
            }
            return Err(GoogleApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GoogleApiError::Decode(e.to_string()))
    }
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))
}

#[async_trait]
impl GoogleApi for GoogleClient {
    async fn exchange_code(&self, code: &str) -> Result<GoogleTokens, GoogleApiError> {
        let response = self
            .http
            .post(&self.endpoints.token_uri)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        Self::check_response_json(response).await
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<RefreshedToken, GoogleApiError> {
        let response = send_with_retry(self.retry, || {
            self.http.post(&self.endpoints.token_uri).form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
        })
        .await?;

        Self::check_response_json(response).await
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<UserInfo, GoogleApiError> {
        let response = send_with_retry(self.retry, || {
            self.http
                .get(&self.endpoints.userinfo_uri)
                .bearer_auth(access_token)
        })
        .await?;

        Self::check_response_json(response).await
    }

    async fn list_events(
        &self,
        access_token: &str,
        query: &EventQuery,
    ) -> Result<Vec<ApiEvent>, GoogleApiError> {
        let url = format!(
            "{}/calendars/{}/events",
            self.endpoints.calendar_base,
            urlencoding::encode(&query.calendar_id)
        );
        let params = [
            ("timeMin", format_utc_rfc3339(query.time_min)),
            ("timeMax", format_utc_rfc3339(query.time_max)),
            ("maxResults", query.max_results.to_string()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ];

        let response = send_with_retry(self.retry, || {
            self.http
                .get(&url)
                .bearer_auth(access_token)
                .query(&params)
        })
        .await?;

        let list: EventListResponse = Self::check_response_json(response).await?;
        Ok(list.items)
    }
}
