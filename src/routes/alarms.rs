// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Alarm CRUD routes.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{delete, get},
    Json, Router,
};
use std::sync::Arc;

use super::{EmailQuery, MessageResponse};
use crate::error::{AppError, Result};
use crate::models::{Alarm, NewAlarm};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/alarms", get(list_alarms).post(create_alarm))
        .route("/api/alarms/{alarm_id}", delete(delete_alarm))
}

/// Create or replace the alarm for an event.
async fn create_alarm(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<NewAlarm>, JsonRejection>,
) -> Result<Json<Alarm>> {
    let Json(request) = body?;

    if request.email.trim().is_empty() || request.event_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "email and event_id must not be empty".to_string(),
        ));
    }

    let alarm = state.alarms.upsert_alarm(request).await?;
    Ok(Json(alarm))
}

/// All alarms for the user.
async fn list_alarms(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<Vec<Alarm>>> {
    let Query(query) = query?;
    let email = query.require()?;

    Ok(Json(state.alarms.list_alarms(&email).await?))
}

/// Delete one of the user's alarms.
async fn delete_alarm(
    State(state): State<Arc<AppState>>,
    alarm_id: std::result::Result<Path<String>, PathRejection>,
    query: std::result::Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>> {
    let Path(alarm_id) = alarm_id?;
    let Query(query) = query?;
    let email = query.require()?;

    state.alarms.delete_alarm(&alarm_id, &email).await?;

    Ok(Json(MessageResponse {
        message: "Alarm deleted successfully".to_string(),
    }))
}
