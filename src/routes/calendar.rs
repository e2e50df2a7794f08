// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar routes.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::EmailQuery;
use crate::error::Result;
use crate::models::EventRecord;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/calendar/events", get(get_events))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EventsResponse {
    pub events: Vec<EventRecord>,
}

/// Upcoming events for the user.
async fn get_events(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>> {
    let Query(query) = query?;
    let email = query.require()?;

    let events = state.calendar.list_upcoming_events(&email).await?;

    Ok(Json(EventsResponse { events }))
}
