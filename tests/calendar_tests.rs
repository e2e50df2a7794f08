// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upcoming event listing.

use calendar_alarm::config::Config;
use calendar_alarm::error::AppError;
use calendar_alarm::services::google::{ApiEvent, ApiEventTime};
use chrono::{Duration, Utc};

mod common;
use common::{create_test_app, create_test_app_with, stored_credential, FakeGoogle};

fn timed_event(id: &str, title: &str, start: &str) -> ApiEvent {
    ApiEvent {
        id: id.to_string(),
        summary: Some(title.to_string()),
        start: Some(ApiEventTime {
            date_time: Some(start.to_string()),
            date: None,
        }),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_events_query_window() {
    let app = create_test_app();
    app.memory
        .upsert_credential(&stored_credential("a@x.com", Some(Utc::now() + Duration::hours(1))));
    let before = Utc::now();

    let events = app
        .state
        .calendar
        .list_upcoming_events("a@x.com")
        .await
        .unwrap();
    let after = Utc::now();

    assert!(events.is_empty());
    let query = app.google.last_event_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.calendar_id, "primary");
    assert_eq!(query.max_results, 50);
    assert!(query.time_min >= before && query.time_min <= after);
    assert_eq!(query.time_max - query.time_min, Duration::days(30));
    assert_eq!(app.google.calls(), vec!["events:ya29.stored"]);
}

#[tokio::test]
async fn test_events_are_normalized_in_order() {
    let google = FakeGoogle {
        events: vec![
            timed_event("ev1", "Standup", "2024-01-01T09:00:00Z"),
            ApiEvent {
                id: "ev2".to_string(),
                start: Some(ApiEventTime {
                    date_time: None,
                    date: Some("2024-01-02".to_string()),
                }),
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    let app = create_test_app_with(Config::test_default(), google);
    app.memory.upsert_credential(&stored_credential("a@x.com", None));

    let events = app
        .state
        .calendar
        .list_upcoming_events("a@x.com")
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "ev1");
    assert_eq!(events[0].title, "Standup");
    assert_eq!(events[0].start.as_deref(), Some("2024-01-01T09:00:00Z"));
    assert_eq!(events[1].title, "No Title");
    assert_eq!(events[1].start.as_deref(), Some("2024-01-02"));
    assert_eq!(events[1].end, None);
}

#[tokio::test]
async fn test_expired_token_is_refreshed_before_listing() {
    let app = create_test_app();
    app.memory
        .upsert_credential(&stored_credential("a@x.com", Some(Utc::now() - Duration::hours(1))));

    app.state
        .calendar
        .list_upcoming_events("a@x.com")
        .await
        .unwrap();

    assert_eq!(
        app.google.calls(),
        vec!["refresh:1//stored-refresh", "events:ya29.refreshed"]
    );
}

#[tokio::test]
async fn test_google_failure_is_calendar_fetch_failed() {
    let google = FakeGoogle {
        events_status: Some(403),
        ..Default::default()
    };
    let app = create_test_app_with(Config::test_default(), google);
    app.memory.upsert_credential(&stored_credential("a@x.com", None));

    let result = app.state.calendar.list_upcoming_events("a@x.com").await;

    assert!(matches!(result, Err(AppError::CalendarFetchFailed(_))));
}

#[tokio::test]
async fn test_unknown_user_is_unauthenticated() {
    let app = create_test_app();

    let result = app.state.calendar.list_upcoming_events("nobody@x.com").await;

    assert!(matches!(result, Err(AppError::Unauthenticated)));
    assert!(app.google.calls().is_empty());
}
