// File: crates/calbridge_gcal/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::handlers;
use crate::logic::{
    AuthUrlResponse, DeleteResponse, EventsResponse, OAuthCallbackResponse, SyncRequest,
    SyncResponse,
};
use crate::sync::{EventRow, SkippedRow};

/// Start or end of an event. Timed events use `dateTime`, all-day events `date`.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTimeSchema {
    #[schema(example = "2025-05-15T10:00:00Z")]
    date_time: Option<String>,
    #[schema(example = "2025-05-15", format = "date")]
    date: Option<String>,
    #[schema(example = "Europe/Zurich")]
    time_zone: Option<String>,
}

/// The commonly used subset of the Google Calendar v3 event resource.
/// Other fields are passed through unchanged.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventSchema {
    #[schema(example = "abc123xyz456")]
    id: Option<String>,
    #[schema(example = "Weekly planning")]
    summary: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start: Option<EventDateTimeSchema>,
    end: Option<EventDateTimeSchema>,
    #[schema(example = json!(["RRULE:FREQ=WEEKLY;COUNT=10"]))]
    recurrence: Option<Vec<String>>,
    #[schema(example = "confirmed")]
    status: Option<String>,
    /// Set on instances of a recurring event
    recurring_event_id: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_event_handler,
        handlers::list_events_handler,
        handlers::update_event_handler,
        handlers::delete_event_handler,
        handlers::auth_url_handler,
        handlers::oauth_callback_handler,
        handlers::sync_events_handler
    ),
    components(
        schemas(
            EventSchema,
            EventDateTimeSchema,
            EventsResponse,
            DeleteResponse,
            AuthUrlResponse,
            OAuthCallbackResponse,
            SyncRequest,
            SyncResponse,
            EventRow,
            SkippedRow
        )
    ),
    tags(
        (name = "GCal", description = "Google Calendar event API")
    ),
    servers(
        (url = "/api", description = "Google Calendar API server")
    )
)]
pub struct GcalApiDoc;
