// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Alarm create/replace, listing, and deletion.

use calendar_alarm::error::AppError;
use calendar_alarm::models::NewAlarm;

mod common;
use common::create_test_app;

fn new_alarm(email: &str, event_id: &str, minutes: i64) -> NewAlarm {
    NewAlarm {
        email: email.to_string(),
        event_id: event_id.to_string(),
        event_title: "Standup".to_string(),
        event_start: "2024-01-01T09:00:00Z".to_string(),
        alarm_minutes_before: minutes,
    }
}

#[tokio::test]
async fn test_upsert_then_replace_keeps_single_record() {
    let app = create_test_app();
    let alarms = &app.state.alarms;

    let first = alarms.upsert_alarm(new_alarm("a@x.com", "ev1", 10)).await.unwrap();
    let listed = alarms.list_alarms("a@x.com").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].alarm_minutes_before, 10);
    assert_eq!(listed[0].event_title, "Standup");

    let second = alarms.upsert_alarm(new_alarm("a@x.com", "ev1", 5)).await.unwrap();
    let listed = alarms.list_alarms("a@x.com").await.unwrap();
    assert_eq!(listed.len(), 1, "Second upsert must not add a row");
    assert_eq!(listed[0].alarm_minutes_before, 5);

    // Replacement keeps the original id, and the returned record is queryable.
    assert_eq!(first.id, second.id);
    assert_eq!(listed[0].id, second.id);
    assert!(second.created_at >= first.created_at);
}

#[tokio::test]
async fn test_alarms_are_per_event_and_per_user() {
    let app = create_test_app();
    let alarms = &app.state.alarms;

    alarms.upsert_alarm(new_alarm("a@x.com", "ev1", 10)).await.unwrap();
    alarms.upsert_alarm(new_alarm("a@x.com", "ev2", 15)).await.unwrap();
    alarms.upsert_alarm(new_alarm("b@x.com", "ev1", 20)).await.unwrap();

    let mut mine = alarms.list_alarms("a@x.com").await.unwrap();
    mine.sort_by(|a, b| a.event_id.cmp(&b.event_id));
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].alarm_minutes_before, 10);
    assert_eq!(mine[1].alarm_minutes_before, 15);

    let theirs = alarms.list_alarms("b@x.com").await.unwrap();
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].alarm_minutes_before, 20);
}

#[tokio::test]
async fn test_zero_and_negative_lead_times_are_stored() {
    let app = create_test_app();
    let alarms = &app.state.alarms;

    alarms.upsert_alarm(new_alarm("a@x.com", "ev1", 0)).await.unwrap();
    alarms.upsert_alarm(new_alarm("a@x.com", "ev2", -30)).await.unwrap();

    let mut listed = alarms.list_alarms("a@x.com").await.unwrap();
    listed.sort_by(|a, b| a.event_id.cmp(&b.event_id));
    assert_eq!(listed[0].alarm_minutes_before, 0);
    assert_eq!(listed[1].alarm_minutes_before, -30);
}

#[tokio::test]
async fn test_delete_then_list_is_empty() {
    let app = create_test_app();
    let alarms = &app.state.alarms;

    let alarm = alarms.upsert_alarm(new_alarm("a@x.com", "ev1", 10)).await.unwrap();
    alarms.delete_alarm(&alarm.id, "a@x.com").await.unwrap();

    assert!(alarms.list_alarms("a@x.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_with_other_email_is_not_found() {
    let app = create_test_app();
    let alarms = &app.state.alarms;

    let alarm = alarms.upsert_alarm(new_alarm("a@x.com", "ev1", 10)).await.unwrap();

    let result = alarms.delete_alarm(&alarm.id, "intruder@x.com").await;
    assert!(matches!(result, Err(AppError::AlarmNotFound)));

    let listed = alarms.list_alarms("a@x.com").await.unwrap();
    assert_eq!(listed.len(), 1, "Record must survive a foreign delete");
}

#[tokio::test]
async fn test_delete_unknown_id_is_not_found() {
    let app = create_test_app();

    let result = app.state.alarms.delete_alarm("missing", "a@x.com").await;

    assert!(matches!(result, Err(AppError::AlarmNotFound)));
}

#[tokio::test]
async fn test_deleting_twice_fails_second_time() {
    let app = create_test_app();
    let alarms = &app.state.alarms;

    let alarm = alarms.upsert_alarm(new_alarm("a@x.com", "ev1", 10)).await.unwrap();
    alarms.delete_alarm(&alarm.id, "a@x.com").await.unwrap();

    let again = alarms.delete_alarm(&alarm.id, "a@x.com").await;
    assert!(matches!(again, Err(AppError::AlarmNotFound)));
}
