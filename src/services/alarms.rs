// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user, per-event alarm settings.

use crate::db::Store;
use crate::error::AppError;
use crate::models::{Alarm, AlarmDocument, NewAlarm};
use chrono::Utc;

/// CRUD over alarms with one alarm per (email, event_id).
///
/// Each operation is an independent read-modify-write; concurrent upserts
/// for the same event are last-write-wins.
#[derive(Clone)]
pub struct AlarmService {
    store: Store,
}

impl AlarmService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create the alarm for an event, or replace the existing one.
    ///
    /// Replacing keeps the existing alarm id so clients holding it can still
    /// delete the alarm; every other field, including `created_at`, is
    /// overwritten.
    pub async fn upsert_alarm(&self, request: NewAlarm) -> Result<Alarm, AppError> {
        let existing = self
            .store
            .find_alarm_for_event(&request.email, &request.event_id)
            .await?;

        let id = match &existing {
            Some(doc) => doc.id.clone(),
            None => uuid::Uuid::new_v4().to_string(),
        };

        let alarm = Alarm {
            id,
            email: request.email,
            event_id: request.event_id,
            event_title: request.event_title,
            event_start: request.event_start,
            alarm_minutes_before: request.alarm_minutes_before,
            created_at: Utc::now(),
        };

        self.store.put_alarm(&AlarmDocument::from(&alarm)).await?;

        tracing::info!(
            alarm_id = %alarm.id,
            event_id = %alarm.event_id,
            minutes_before = alarm.alarm_minutes_before,
            replaced = existing.is_some(),
            "Alarm saved"
        );

        Ok(alarm)
    }

    /// All alarms for a user, in store order.
    pub async fn list_alarms(&self, email: &str) -> Result<Vec<Alarm>, AppError> {
        self.store
            .list_alarms(email)
            .await?
            .into_iter()
            .map(Alarm::try_from)
            .collect()
    }

    /// Delete an alarm owned by `email`.
    ///
    /// An id that exists but belongs to someone else is reported as not found.
    pub async fn delete_alarm(&self, id: &str, email: &str) -> Result<(), AppError> {
        if !self.store.delete_alarm(id, email).await? {
            return Err(AppError::AlarmNotFound);
        }

        tracing::info!(alarm_id = id, "Alarm deleted");
        Ok(())
    }
}
