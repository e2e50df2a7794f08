// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod alarm;
pub mod credential;
pub mod event;

pub use alarm::{Alarm, AlarmDocument, NewAlarm};
pub use credential::{GoogleTokens, UserCredential, ValidCredential};
pub use event::EventRecord;
