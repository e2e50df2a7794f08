// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth authentication routes.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Redirect,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::EmailQuery;
use crate::error::{AppError, Result};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/google/login", get(google_login))
        .route("/api/auth/google/callback", get(google_callback))
        .route("/api/auth/status", get(auth_status))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub authorization_url: String,
}

/// Start OAuth flow - hand the consent URL to the frontend.
async fn google_login(State(state): State<Arc<AppState>>) -> Result<Json<LoginResponse>> {
    let authorization_url = state.oauth.build_authorization_url()?;
    tracing::info!("Starting OAuth flow");
    Ok(Json(LoginResponse { authorization_url }))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
}

/// OAuth callback - exchange code for tokens, then send the browser home.
async fn google_callback(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Redirect> {
    let Query(params) = params?;
    let code = params.code.filter(|c| !c.is_empty()).ok_or_else(|| {
        AppError::BadRequest("Missing required query parameter: code".to_string())
    })?;

    let result = state.oauth.complete_exchange(&code).await?;

    Ok(Redirect::temporary(&result.redirect_to))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Whether Google tokens are stored for the given email.
async fn auth_status(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<AuthStatusResponse>> {
    let Query(query) = query?;
    let email = query.require()?;

    let authenticated = state
        .store
        .get_credential(&email)
        .await?
        .is_some_and(|c| c.google_tokens.is_some());

    Ok(Json(AuthStatusResponse {
        authenticated,
        email: authenticated.then_some(email),
    }))
}
