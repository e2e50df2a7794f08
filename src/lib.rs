// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar Alarm: custom reminders for Google Calendar events
//!
//! This crate provides the backend API that signs users in with Google,
//! lists their upcoming events, and stores per-event alarm settings.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Store;
use services::{AlarmService, CalendarService, GoogleApi, OAuthFlow, TokenManager};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub tokens: TokenManager,
    pub oauth: OAuthFlow,
    pub calendar: CalendarService,
    pub alarms: AlarmService,
}

impl AppState {
    /// Wire every component to the same store and Google client.
    pub fn new(config: Config, store: Store, google: Arc<dyn GoogleApi>) -> Self {
        let tokens = TokenManager::new(store.clone(), google.clone());
        let oauth = OAuthFlow::new(config.clone(), store.clone(), google.clone());
        let calendar = CalendarService::new(tokens.clone(), google);
        let alarms = AlarmService::new(store.clone());

        Self {
            config,
            store,
            tokens,
            oauth,
            calendar,
            alarms,
        }
    }
}
