// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("User not authenticated with Google")]
    Unauthenticated,

    #[error("Token refresh failed")]
    TokenRefreshFailed,

    #[error(
        "Google OAuth not configured. Please set GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET"
    )]
    OAuthNotConfigured,

    #[error("Failed to exchange code for tokens")]
    TokenExchangeFailed,

    #[error("Failed to get user info")]
    UserInfoFailed,

    #[error("OAuth exchange error: {0}")]
    ExchangeError(String),

    #[error("Calendar fetch failed: {0}")]
    CalendarFetchFailed(String),

    #[error("Alarm not found")]
    AlarmNotFound,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl AppError {
    /// HTTP status and stable machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            AppError::TokenRefreshFailed => (StatusCode::UNAUTHORIZED, "token_refresh_failed"),
            AppError::OAuthNotConfigured => {
                (StatusCode::INTERNAL_SERVER_ERROR, "oauth_not_configured")
            }
            AppError::TokenExchangeFailed => (StatusCode::BAD_REQUEST, "token_exchange_failed"),
            AppError::UserInfoFailed => (StatusCode::BAD_REQUEST, "userinfo_failed"),
            AppError::ExchangeError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "exchange_error"),
            AppError::CalendarFetchFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "calendar_fetch_failed")
            }
            AppError::AlarmNotFound => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_code();

        // Server-side failures carry backend detail; keep it in the logs.
        let details = match &self {
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                "Internal server error".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
