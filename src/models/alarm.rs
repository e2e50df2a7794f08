// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Alarm model for storage and API.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Request body for creating or replacing an alarm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NewAlarm {
    pub email: String,
    pub event_id: String,
    pub event_title: String,
    pub event_start: String,
    /// Lead time before the event; zero and negative values are accepted as-is
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub alarm_minutes_before: i64,
}

/// Alarm as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Alarm {
    pub id: String,
    pub email: String,
    pub event_id: String,
    /// Snapshot of the event title at creation time
    pub event_title: String,
    /// Snapshot of the event start at creation time
    pub event_start: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub alarm_minutes_before: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
}

/// Alarm document stored in the `alarms` collection (document ID = `id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmDocument {
    pub id: String,
    pub email: String,
    pub event_id: String,
    pub event_title: String,
    pub event_start: String,
    pub alarm_minutes_before: i64,
    /// ISO 8601 creation time
    pub created_at: String,
}

impl From<&Alarm> for AlarmDocument {
    fn from(alarm: &Alarm) -> Self {
        Self {
            id: alarm.id.clone(),
            email: alarm.email.clone(),
            event_id: alarm.event_id.clone(),
            event_title: alarm.event_title.clone(),
            event_start: alarm.event_start.clone(),
            alarm_minutes_before: alarm.alarm_minutes_before,
            created_at: crate::time_utils::format_utc_rfc3339_micros(alarm.created_at),
        }
    }
}

impl TryFrom<AlarmDocument> for Alarm {
    type Error = AppError;

    fn try_from(doc: AlarmDocument) -> Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&doc.created_at)
            .map_err(|e| {
                AppError::Database(format!(
                    "Alarm {} has invalid created_at {:?}: {}",
                    doc.id, doc.created_at, e
                ))
            })?
            .with_timezone(&Utc);

        Ok(Self {
            id: doc.id,
            email: doc.email,
            event_id: doc.event_id,
            event_title: doc.event_title,
            event_start: doc.event_start,
            alarm_minutes_before: doc.alarm_minutes_before,
            created_at,
        })
    }
}
