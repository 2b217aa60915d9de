use std::sync::Arc;

use calbridge_gcal::auth::HubType;
use calbridge_gcal::service::GoogleCalendarService;
use calbridge_gcal::{payload_from_json, CalendarClientAdapter, GcalServiceError, RemoteErrorKind};
use chrono::{TimeZone, Utc};
use google_calendar3::hyper_rustls::HttpsConnectorBuilder;
use google_calendar3::hyper_util::client::legacy::Client;
use google_calendar3::CalendarHub;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An adapter whose hub talks to `server` with a fixed bearer token.
fn adapter_for(server: &MockServer) -> CalendarClientAdapter {
    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .expect("native roots")
        .https_or_http()
        .enable_http1()
        .build();
    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    let mut hub: HubType = CalendarHub::new(client, String::from("test-token"));
    hub.base_url(format!("{}/calendar/v3/", server.uri()));

    CalendarClientAdapter::with_service(Arc::new(GoogleCalendarService::new(Arc::new(hub))))
}

fn payload() -> calbridge_gcal::EventPayload {
    payload_from_json(json!({
        "summary": "Standup",
        "start": { "dateTime": "2025-05-15T09:00:00Z" },
        "end": { "dateTime": "2025-05-15T09:15:00Z" }
    }))
    .unwrap()
}

#[tokio::test]
async fn list_sends_window_expansion_and_ordering() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .and(query_param("timeMin", "2025-05-01T00:00:00.000Z"))
        .and(query_param("timeMax", "2025-06-01T00:00:00.000Z"))
        .and(query_param("singleEvents", "true"))
        .and(query_param("orderBy", "startTime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "calendar#events",
            "items": [
                { "id": "a1", "summary": "Standup", "start": { "dateTime": "2025-05-15T09:00:00Z" } },
                { "id": "b2", "summary": "Review", "start": { "dateTime": "2025-05-20T14:00:00Z" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = adapter_for(&server);
    let start = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let events = adapter.list_events("primary", start, end).await;

    let ids: Vec<_> = events.iter().filter_map(|e| e.id.as_deref()).collect();
    assert_eq!(ids, vec!["a1", "b2"]);
}

#[tokio::test]
async fn insert_returns_the_stored_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "evt-42",
            "status": "confirmed",
            "summary": "Standup",
            "start": { "dateTime": "2025-05-15T09:00:00Z" },
            "end": { "dateTime": "2025-05-15T09:15:00Z" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = adapter_for(&server)
        .create_event("primary", payload())
        .await
        .expect("event should be created");
    assert_eq!(created.id.as_deref(), Some("evt-42"));
    assert_eq!(created.status.as_deref(), Some("confirmed"));
}

#[tokio::test]
async fn update_of_unknown_event_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/calendar/v3/calendars/primary/events/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": 404,
                "message": "Not Found",
                "errors": [{ "domain": "global", "reason": "notFound", "message": "Not Found" }]
            }
        })))
        .mount(&server)
        .await;

    let adapter = adapter_for(&server);
    assert!(adapter.update_event("primary", "missing", payload()).await.is_none());

    let err = adapter
        .try_update_event("primary", "missing", payload())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(RemoteErrorKind::NotFound));
}

#[tokio::test]
async fn delete_with_empty_204_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/calendar/v3/calendars/primary/events/evt-42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    assert!(adapter_for(&server).delete_event("primary", "evt-42").await);
}

#[tokio::test]
async fn bodiless_500_is_a_server_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let adapter = adapter_for(&server);
    let err = adapter.try_create_event("primary", payload()).await.unwrap_err();
    assert!(matches!(
        err,
        GcalServiceError::Remote { kind: RemoteErrorKind::Server, status: Some(500), .. }
    ));
    assert!(adapter.create_event("primary", payload()).await.is_none());
}

#[tokio::test]
async fn quota_403_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/calendar/v3/calendars/primary/events/evt-42"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "Rate Limit Exceeded",
                "errors": [{ "domain": "usageLimits", "reason": "rateLimitExceeded" }]
            }
        })))
        .mount(&server)
        .await;

    let adapter = adapter_for(&server);
    let err = adapter.try_delete_event("primary", "evt-42").await.unwrap_err();
    assert_eq!(err.kind(), Some(RemoteErrorKind::RateLimited));
    assert!(!adapter.delete_event("primary", "evt-42").await);
}
