use std::sync::Arc;

use crate::calendar::{
    calendar_list_url, event_body, events_url, sync_target, week_events_url,
    CalendarListResponse, CalendarServiceImpl, EventListResponse, EventTime,
};
use reqwest::Method;
use service::calendar::{CalendarEvent, CalendarService};
use service::config::MockConfigService;
use service::shift::Shift;
use shopshift_utils::StoreWeek;
use time::macros::date;

use super::employee::default_employee;
use super::shift::default_shift;
use super::slot::default_config;

#[test]
fn test_event_body() {
    let body = event_body(&default_shift(), &default_employee()).unwrap();
    assert_eq!(body.summary, "Jane Doe - associate");
    assert_eq!(body.description, "Shift for Jane Doe");
    assert_eq!(
        body.start,
        EventTime {
            date_time: "2024-06-12T10:00:00".into(),
            time_zone: "UTC",
        }
    );
    assert_eq!(body.end.date_time, "2024-06-12T14:00:00");
}

#[test]
fn test_event_body_uses_note() {
    let shift = Shift {
        note: Some("Inventory".into()),
        ..default_shift()
    };
    let body = event_body(&shift, &default_employee()).unwrap();
    assert_eq!(body.description, "Inventory");
}

#[test]
fn test_event_body_serializes_google_fields() {
    let body = event_body(&default_shift(), &default_employee()).unwrap();
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["start"]["dateTime"], "2024-06-12T10:00:00");
    assert_eq!(json["end"]["timeZone"], "UTC");
}

#[test]
fn test_events_url() {
    let url = events_url("https://calendar.example.com/v3/", "team@example.com", None).unwrap();
    assert_eq!(
        url.as_str(),
        "https://calendar.example.com/v3/calendars/team@example.com/events"
    );
    let url = events_url(
        "https://calendar.example.com/v3",
        "a/b",
        Some("event 1"),
    )
    .unwrap();
    assert_eq!(
        url.as_str(),
        "https://calendar.example.com/v3/calendars/a%2Fb/events/event%201"
    );
}

#[test]
fn test_events_url_rejects_invalid_api_url() {
    assert!(events_url("not a url", "primary", None).is_err());
}

#[tokio::test]
async fn test_sync_without_calendar_is_noop() {
    let mut config_service = MockConfigService::new();
    config_service
        .expect_get_config()
        .returning(|| Ok(default_config()));
    let calendar = CalendarServiceImpl::new(Arc::new(config_service));
    let event_id = calendar
        .sync_shift(&default_shift(), &default_employee())
        .await
        .unwrap();
    assert_eq!(event_id, None);
    calendar.delete_event("event-1").await.unwrap();
    assert!(calendar
        .week_events(date!(2024 - 06 - 12))
        .await
        .unwrap()
        .is_empty());
    assert!(!calendar.heartbeat().await.unwrap());
}

#[test]
fn test_sync_target_updates_existing_event() {
    let (method, url) =
        sync_target("https://calendar.example.com/v3", "primary", Some("event-1")).unwrap();
    assert_eq!(method, Method::PUT);
    assert_eq!(
        url.as_str(),
        "https://calendar.example.com/v3/calendars/primary/events/event-1"
    );

    let (method, url) = sync_target("https://calendar.example.com/v3", "primary", None).unwrap();
    assert_eq!(method, Method::POST);
    assert_eq!(
        url.as_str(),
        "https://calendar.example.com/v3/calendars/primary/events"
    );
}

#[test]
fn test_week_events_url() {
    let url = week_events_url(
        "https://calendar.example.com/v3",
        "primary",
        StoreWeek::containing(date!(2024 - 06 - 12)),
    )
    .unwrap();
    assert_eq!(url.path(), "/v3/calendars/primary/events");
    let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(query.contains(&("timeMin".into(), "2024-06-10T00:00:00Z".into())));
    assert!(query.contains(&("timeMax".into(), "2024-06-17T00:00:00Z".into())));
    assert!(query.contains(&("orderBy".into(), "startTime".into())));
}

#[test]
fn test_calendar_list_url() {
    let url = calendar_list_url("https://calendar.example.com/v3/").unwrap();
    assert_eq!(
        url.as_str(),
        "https://calendar.example.com/v3/users/me/calendarList"
    );
}

#[test]
fn test_event_list_conversion() {
    let list: EventListResponse = serde_json::from_value(serde_json::json!({
        "items": [
            {
                "id": "event-1",
                "summary": "Jane Doe - associate",
                "start": { "dateTime": "2024-06-12T10:00:00Z" },
                "end": { "dateTime": "2024-06-12T14:00:00Z" }
            },
            {
                "id": "holiday",
                "start": { "date": "2024-06-14" }
            }
        ]
    }))
    .unwrap();
    let events: Vec<CalendarEvent> = list.items.into_iter().map(CalendarEvent::from).collect();
    assert_eq!(events[0].id.as_ref(), "event-1");
    assert_eq!(events[0].summary.as_deref(), Some("Jane Doe - associate"));
    assert_eq!(events[0].end.as_deref(), Some("2024-06-12T14:00:00Z"));
    assert_eq!(events[1].start.as_deref(), Some("2024-06-14"));
    assert_eq!(events[1].end, None);

    let empty: EventListResponse = serde_json::from_str("{}").unwrap();
    assert!(empty.items.is_empty());
}

#[test]
fn test_calendar_list_contains() {
    let list: CalendarListResponse = serde_json::from_value(serde_json::json!({
        "items": [{ "id": "team@example.com" }, { "id": "primary" }]
    }))
    .unwrap();
    assert!(list.contains("team@example.com"));
    assert!(!list.contains("other@example.com"));

    let missing: CalendarListResponse = serde_json::from_str("{}").unwrap();
    assert!(!missing.contains("primary"));
}
