// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upcoming events from the user's primary Google Calendar.

use crate::error::AppError;
use crate::models::EventRecord;
use crate::services::google::{ApiEvent, ApiEventTime, EventQuery, GoogleApi};
use crate::services::tokens::TokenManager;
use chrono::{Duration, Utc};
use std::sync::Arc;

const PRIMARY_CALENDAR: &str = "primary";
const LOOKAHEAD_DAYS: i64 = 30;
const MAX_EVENTS: u32 = 50;

/// Title used for events without a summary.
pub const DEFAULT_TITLE: &str = "No Title";

#[derive(Clone)]
pub struct CalendarService {
    tokens: TokenManager,
    google: Arc<dyn GoogleApi>,
}

impl CalendarService {
    pub fn new(tokens: TokenManager, google: Arc<dyn GoogleApi>) -> Self {
        Self { tokens, google }
    }

    /// Events starting in the next 30 days, earliest first, at most 50.
    pub async fn list_upcoming_events(&self, email: &str) -> Result<Vec<EventRecord>, AppError> {
        let credential = self.tokens.resolve_credentials(email).await?;

        let now = Utc::now();
        let query = EventQuery {
            calendar_id: PRIMARY_CALENDAR.to_string(),
            time_min: now,
            time_max: now + Duration::days(LOOKAHEAD_DAYS),
            max_results: MAX_EVENTS,
        };

        let events = self
            .google
            .list_events(&credential.access_token, &query)
            .await
            .map_err(|e| {
                tracing::error!(email, error = %e, "Error fetching calendar events");
                AppError::CalendarFetchFailed(e.to_string())
            })?;

        tracing::debug!(email, count = events.len(), "Fetched calendar events");

        Ok(events.into_iter().map(normalize_event).collect())
    }
}

/// Flatten a Google event into the shape the frontend consumes.
pub fn normalize_event(event: ApiEvent) -> EventRecord {
    EventRecord {
        id: event.id,
        title: event.summary.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: event.description.unwrap_or_default(),
        start: event.start.and_then(pick_time),
        end: event.end.and_then(pick_time),
        location: event.location.unwrap_or_default(),
        html_link: event.html_link.unwrap_or_default(),
    }
}

fn pick_time(time: ApiEventTime) -> Option<String> {
    time.date_time.or(time.date)
}
