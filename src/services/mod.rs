// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod alarms;
pub mod calendar;
pub mod google;
pub mod oauth;
pub mod retry;
pub mod tokens;

pub use alarms::AlarmService;
pub use calendar::CalendarService;
pub use google::{GoogleApi, GoogleApiError, GoogleClient};
pub use oauth::{OAuthFlow, OAuthResult};
pub use retry::RetryPolicy;
pub use tokens::TokenManager;
