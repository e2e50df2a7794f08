// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod alarms;
pub mod auth;
pub mod calendar;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::AppState;
use axum::http::HeaderValue;
use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Plain `{message}` body.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub message: String,
}

/// API liveness probe.
async fn api_root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Google Calendar Alarm API".to_string(),
    })
}

/// Query string carrying the caller's identity.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    email: Option<String>,
}

impl EmailQuery {
    /// The `email` parameter, which must be present and non-empty.
    pub fn require(self) -> Result<String> {
        self.email.filter(|e| !e.trim().is_empty()).ok_or_else(|| {
            AppError::BadRequest("Missing required query parameter: email".to_string())
        })
    }
}

/// CORS for the configured frontend origins. A `*` entry admits any origin;
/// the origin is echoed back so credentials still work.
fn cors_layer(config: &Config) -> CorsLayer {
    let allow_origin = if config.allows_any_origin() {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    let api_routes = Router::new()
        .route("/api", get(api_root))
        .route("/api/", get(api_root))
        .merge(auth::routes())
        .merge(calendar::routes())
        .merge(alarms::routes());

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
