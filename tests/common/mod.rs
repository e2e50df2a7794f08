// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use calendar_alarm::config::Config;
use calendar_alarm::db::{FirestoreStore, MemoryStore, Store};
use calendar_alarm::models::{GoogleTokens, UserCredential};
use calendar_alarm::routes::create_router;
use calendar_alarm::services::google::{
    ApiEvent, EventQuery, GoogleApi, GoogleApiError, RefreshedToken, UserInfo,
};
use calendar_alarm::AppState;
use std::sync::{Arc, Mutex};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection against the emulator.
#[allow(dead_code)]
pub async fn test_firestore() -> Store {
    Store::Firestore(
        FirestoreStore::new("test-project", "(default)")
            .await
            .expect("Failed to connect to Firestore emulator"),
    )
}

/// Scriptable stand-in for Google. `None` statuses mean success.
#[allow(dead_code)]
pub struct FakeGoogle {
    pub tokens: GoogleTokens,
    pub exchange_status: Option<u16>,
    pub email: Option<String>,
    pub userinfo_status: Option<u16>,
    pub refreshed_access_token: String,
    pub refresh_status: Option<u16>,
    pub refreshed_expires_in: Option<i64>,
    /// Drop this user's token bundle while a refresh is in flight
    pub revoke_during_refresh: Mutex<Option<(MemoryStore, String)>>,
    pub events: Vec<ApiEvent>,
    pub events_status: Option<u16>,
    /// Log of calls, e.g. `refresh:<token>` or `events:<access token>`
    pub calls: Mutex<Vec<String>>,
    pub last_event_query: Mutex<Option<EventQuery>>,
}

impl Default for FakeGoogle {
    fn default() -> Self {
        Self {
            tokens: GoogleTokens {
                access_token: "ya29.fresh".to_string(),
                refresh_token: Some("1//refresh".to_string()),
                expires_in: Some(3599),
                expires_at: None,
                scope: Some(
                    "https://www.googleapis.com/auth/calendar.readonly https://www.googleapis.com/auth/userinfo.email"
                        .to_string(),
                ),
                token_type: Some("Bearer".to_string()),
                id_token: None,
            },
            exchange_status: None,
            email: Some("a@x.com".to_string()),
            userinfo_status: None,
            refreshed_access_token: "ya29.refreshed".to_string(),
            refresh_status: None,
            refreshed_expires_in: Some(3599),
            revoke_during_refresh: Mutex::new(None),
            events: Vec::new(),
            events_status: None,
            calls: Mutex::new(Vec::new()),
            last_event_query: Mutex::new(None),
        }
    }
}

#[allow(dead_code)]
impl FakeGoogle {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn status_error(status: u16) -> GoogleApiError {
    GoogleApiError::Status {
        status,
        body: format!("{{\"error\": \"fake {}\"}}", status),
    }
}

#[async_trait]
impl GoogleApi for FakeGoogle {
    async fn exchange_code(&self, code: &str) -> Result<GoogleTokens, GoogleApiError> {
        self.record(format!("exchange:{}", code));
        match self.exchange_status {
            Some(status) => Err(status_error(status)),
            None => Ok(self.tokens.clone()),
        }
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<RefreshedToken, GoogleApiError> {
        self.record(format!("refresh:{}", refresh_token));
        let revoke = self.revoke_during_refresh.lock().unwrap().take();
        if let Some((memory, email)) = revoke {
            memory.upsert_credential(&UserCredential {
                email,
                google_tokens: None,
                updated_at: "2024-01-02T00:00:00Z".to_string(),
            });
        }
        match self.refresh_status {
            Some(status) => Err(status_error(status)),
            None => Ok(RefreshedToken {
                access_token: self.refreshed_access_token.clone(),
                expires_in: self.refreshed_expires_in,
            }),
        }
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<UserInfo, GoogleApiError> {
        self.record(format!("userinfo:{}", access_token));
        match self.userinfo_status {
            Some(status) => Err(status_error(status)),
            None => Ok(UserInfo {
                email: self.email.clone(),
            }),
        }
    }

    async fn list_events(
        &self,
        access_token: &str,
        query: &EventQuery,
    ) -> Result<Vec<ApiEvent>, GoogleApiError> {
        self.record(format!("events:{}", access_token));
        *self.last_event_query.lock().unwrap() = Some(query.clone());
        match self.events_status {
            Some(status) => Err(status_error(status)),
            None => Ok(self.events.clone()),
        }
    }
}

/// Handles to everything a test may want to poke at.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub memory: MemoryStore,
    pub google: Arc<FakeGoogle>,
}

/// Create a test app backed by the in-memory store and a fake Google.
#[allow(dead_code)]
pub fn create_test_app_with(config: Config, google: FakeGoogle) -> TestApp {
    let memory = MemoryStore::new();
    let google = Arc::new(google);
    let state = Arc::new(AppState::new(
        config,
        Store::Memory(memory.clone()),
        google.clone(),
    ));

    TestApp {
        router: create_router(state.clone()),
        state,
        memory,
        google,
    }
}

#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with(Config::test_default(), FakeGoogle::default())
}

/// A stored credential whose access token expires at `expires_at`.
#[allow(dead_code)]
pub fn stored_credential(
    email: &str,
    expires_at: Option<chrono::DateTime<chrono::Utc>>,
) -> UserCredential {
    UserCredential {
        email: email.to_string(),
        google_tokens: Some(GoogleTokens {
            access_token: "ya29.stored".to_string(),
            refresh_token: Some("1//stored-refresh".to_string()),
            expires_in: Some(3599),
            expires_at: expires_at.map(calendar_alarm::time_utils::format_utc_rfc3339),
            scope: Some("https://www.googleapis.com/auth/calendar.readonly".to_string()),
            token_type: Some("Bearer".to_string()),
            id_token: Some("eyJ.id.token".to_string()),
        }),
        updated_at: "2024-01-01T00:00:00Z".to_string(),
    }
}
