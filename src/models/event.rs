// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Normalized calendar event returned to the frontend.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Flat view of one Google Calendar event. Recomputed on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `dateTime` for timed events, `date` for all-day events
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: String,
    #[serde(rename = "htmlLink")]
    pub html_link: String,
}
