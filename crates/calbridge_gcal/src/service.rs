// --- File: crates/calbridge_gcal/src/service.rs ---
//! Google Calendar event service.
//!
//! `CalendarService` is the seam between the adapter and the remote API: the
//! production implementation forwards every call to a `CalendarHub`, tests
//! swap in an in-memory calendar.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use google_calendar3::api::{Event, Events};

use crate::auth::{HubType, CALENDAR_SCOPE};
use crate::error::GcalServiceError;

/// A boxed future returned by `CalendarService` methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, GcalServiceError>> + Send + 'a>>;

/// Parameters of a single `events.list` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEventsQuery {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    /// Expand recurring events into their instances.
    pub single_events: bool,
    pub order_by: Option<String>,
}

impl ListEventsQuery {
    /// Instances in `[time_min, time_max)`, ordered by start time.
    pub fn expanded(time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> Self {
        Self {
            time_min,
            time_max,
            single_events: true,
            order_by: Some("startTime".to_string()),
        }
    }
}

/// One method per remote call. Each issues exactly one request.
pub trait CalendarService: Send + Sync {
    fn insert_event(&self, calendar_id: &str, event: Event) -> BoxFuture<'_, Event>;

    /// Full replace of an existing event.
    fn update_event(&self, calendar_id: &str, event_id: &str, event: Event)
        -> BoxFuture<'_, Event>;

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, ()>;

    /// First page of `events.list`; `next_page_token` is passed through untouched.
    fn list_events(&self, calendar_id: &str, query: ListEventsQuery) -> BoxFuture<'_, Events>;
}

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
}

impl GoogleCalendarService {
    /// Create a new Google Calendar service.
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self { calendar_hub }
    }
}

impl CalendarService for GoogleCalendarService {
    fn insert_event(&self, calendar_id: &str, event: Event) -> BoxFuture<'_, Event> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let (_response, created) = calendar_hub
                .events()
                .insert(event, &calendar_id)
                .add_scope(CALENDAR_SCOPE)
                .doit()
                .await?;
            Ok(created)
        })
    }

    fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: Event,
    ) -> BoxFuture<'_, Event> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let (_response, updated) = calendar_hub
                .events()
                .update(event, &calendar_id, &event_id)
                .add_scope(CALENDAR_SCOPE)
                .doit()
                .await?;
            Ok(updated)
        })
    }

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, ()> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            // The body of a successful delete is empty and carries nothing we need.
            calendar_hub
                .events()
                .delete(&calendar_id, &event_id)
                .add_scope(CALENDAR_SCOPE)
                .doit()
                .await?;
            Ok(())
        })
    }

    fn list_events(&self, calendar_id: &str, query: ListEventsQuery) -> BoxFuture<'_, Events> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let mut request = calendar_hub
                .events()
                .list(&calendar_id)
                .time_min(query.time_min)
                .time_max(query.time_max)
                .single_events(query.single_events)
                .add_scope(CALENDAR_SCOPE);
            if let Some(order_by) = query.order_by.as_deref() {
                request = request.order_by(order_by);
            }

            let (_response, events) = request.doit().await?;
            Ok(events)
        })
    }
}
