// --- File: crates/calbridge_gcal/src/mock.rs ---
//! In-memory `CalendarService` used by the unit tests.
//!
//! Listing keeps the adapter's contract rather than Google's exact filter:
//! an instance is returned when its start lies in `[time_min, time_max)`.
//! Google compares `timeMin` against the event end, so an event already
//! running at `time_min` comes back from the real API but not from here.
//! Daily/weekly `COUNT` rules are expanded for `singleEvents`, results are
//! sorted for `startTime`, and `set_page_size` truncates to a first page
//! with a `next_page_token`.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use google_calendar3::api::{Event, EventDateTime, Events};

use crate::error::{GcalServiceError, RemoteErrorKind};
use crate::service::{BoxFuture, CalendarService, ListEventsQuery};

/// Upper bound for open-ended rules.
const MAX_INSTANCES: usize = 1000;

#[derive(Default)]
pub struct InMemoryCalendarService {
    calendars: Mutex<HashMap<String, Vec<Event>>>,
    next_id: Mutex<u64>,
    failure: Mutex<Option<(RemoteErrorKind, Option<u16>)>>,
    page_size: Mutex<Option<usize>>,
    last_query: Mutex<Option<ListEventsQuery>>,
    calls: Mutex<usize>,
}

impl InMemoryCalendarService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every following call fails like Google answering with `status`.
    pub fn fail_with_status(&self, status: u16) {
        *self.failure.lock().unwrap() = Some((RemoteErrorKind::from_status(status, None), Some(status)));
    }

    /// Every following call fails before reaching the server.
    pub fn fail_with_transport_error(&self) {
        *self.failure.lock().unwrap() = Some((RemoteErrorKind::Transport, None));
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Limits list results to one page of `size` items.
    pub fn set_page_size(&self, size: usize) {
        *self.page_size.lock().unwrap() = Some(size);
    }

    pub fn last_query(&self) -> Option<ListEventsQuery> {
        self.last_query.lock().unwrap().clone()
    }

    /// Number of calls that reached the service, failed or not.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    /// Stored events of a calendar, recurring masters unexpanded.
    pub fn stored(&self, calendar_id: &str) -> Vec<Event> {
        self.calendars
            .lock()
            .unwrap()
            .get(calendar_id)
            .cloned()
            .unwrap_or_default()
    }

    fn check(&self) -> Result<(), GcalServiceError> {
        *self.calls.lock().unwrap() += 1;
        match *self.failure.lock().unwrap() {
            Some((kind, status)) => Err(GcalServiceError::Remote {
                kind,
                status,
                message: format!("simulated {kind} failure"),
            }),
            None => Ok(()),
        }
    }

    fn allocate_id(&self) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("evt{:04}", *next)
    }

    fn not_found(event_id: &str) -> GcalServiceError {
        GcalServiceError::remote(404, format!("event {event_id} not found"))
    }

    fn insert(&self, calendar_id: &str, mut event: Event) -> Result<Event, GcalServiceError> {
        self.check()?;
        if event.start.is_none() || event.end.is_none() {
            return Err(GcalServiceError::remote(400, "Missing start or end time."));
        }
        event.id = Some(self.allocate_id());
        event.status.get_or_insert_with(|| "confirmed".to_string());
        self.calendars
            .lock()
            .unwrap()
            .entry(calendar_id.to_string())
            .or_default()
            .push(event.clone());
        Ok(event)
    }

    fn update(
        &self,
        calendar_id: &str,
        event_id: &str,
        mut event: Event,
    ) -> Result<Event, GcalServiceError> {
        self.check()?;
        let mut calendars = self.calendars.lock().unwrap();
        let slot = calendars
            .get_mut(calendar_id)
            .and_then(|events| events.iter_mut().find(|e| e.id.as_deref() == Some(event_id)))
            .ok_or_else(|| Self::not_found(event_id))?;
        event.id = Some(event_id.to_string());
        event.status.get_or_insert_with(|| "confirmed".to_string());
        *slot = event.clone();
        Ok(event)
    }

    fn delete(&self, calendar_id: &str, event_id: &str) -> Result<(), GcalServiceError> {
        self.check()?;
        let mut calendars = self.calendars.lock().unwrap();
        let events = calendars
            .get_mut(calendar_id)
            .ok_or_else(|| Self::not_found(event_id))?;
        let before = events.len();
        events.retain(|e| e.id.as_deref() != Some(event_id));
        if events.len() == before {
            return Err(Self::not_found(event_id));
        }
        Ok(())
    }

    fn list(&self, calendar_id: &str, query: ListEventsQuery) -> Result<Events, GcalServiceError> {
        self.check()?;
        *self.last_query.lock().unwrap() = Some(query.clone());

        let stored = self.stored(calendar_id);
        let mut items: Vec<Event> = stored
            .iter()
            .flat_map(|event| {
                if query.single_events {
                    expand(event, query.time_max)
                } else {
                    vec![event.clone()]
                }
            })
            // start-in-window, not Google's end-after-time_min
            .filter(|event| {
                start_of(event).is_some_and(|s| s >= query.time_min && s < query.time_max)
            })
            .collect();

        if query.order_by.as_deref() == Some("startTime") {
            items.sort_by_key(start_of);
        }

        let mut next_page_token = None;
        if let Some(size) = *self.page_size.lock().unwrap() {
            if items.len() > size {
                items.truncate(size);
                next_page_token = Some("page-2".to_string());
            }
        }

        Ok(Events {
            items: Some(items),
            next_page_token,
            ..Default::default()
        })
    }
}

fn instant(value: &EventDateTime) -> Option<DateTime<Utc>> {
    value
        .date_time
        .or_else(|| value.date.map(|d| d.and_time(NaiveTime::MIN).and_utc()))
}

fn start_of(event: &Event) -> Option<DateTime<Utc>> {
    event.start.as_ref().and_then(instant)
}

/// Reads `FREQ` and `COUNT` out of an `RRULE:` line.
fn parse_rule(rule: &str) -> Option<(Duration, Option<usize>)> {
    let body = rule.strip_prefix("RRULE:")?;
    let mut step = None;
    let mut count = None;
    for part in body.split(';') {
        match part.split_once('=') {
            Some(("FREQ", "DAILY")) => step = Some(Duration::days(1)),
            Some(("FREQ", "WEEKLY")) => step = Some(Duration::weeks(1)),
            Some(("COUNT", n)) => count = n.parse().ok(),
            _ => {}
        }
    }
    step.map(|s| (s, count))
}

fn shifted(value: &EventDateTime, offset: Duration) -> EventDateTime {
    EventDateTime {
        date_time: value.date_time.map(|dt| dt + offset),
        date: value.date.map(|d| d + offset),
        ..value.clone()
    }
}

/// Instances of a recurring event, or the event itself.
fn expand(event: &Event, horizon: DateTime<Utc>) -> Vec<Event> {
    let rule = event
        .recurrence
        .as_ref()
        .and_then(|rules| rules.iter().find_map(|r| parse_rule(r)));
    let (Some((step, count)), Some(start), Some(end)) = (rule, &event.start, &event.end) else {
        return vec![event.clone()];
    };
    let base_id = event.id.clone().unwrap_or_default();

    let mut instances = Vec::new();
    for n in 0..count.unwrap_or(MAX_INSTANCES).min(MAX_INSTANCES) {
        let offset = step * n as i32;
        let instance_start = shifted(start, offset);
        let Some(at) = instant(&instance_start) else {
            break;
        };
        if at >= horizon {
            break;
        }
        instances.push(Event {
            id: Some(format!("{}_{}", base_id, at.format("%Y%m%dT%H%M%SZ"))),
            recurring_event_id: Some(base_id.clone()),
            original_start_time: Some(instance_start.clone()),
            recurrence: None,
            start: Some(instance_start),
            end: Some(shifted(end, offset)),
            ..event.clone()
        });
    }
    instances
}

impl CalendarService for InMemoryCalendarService {
    fn insert_event(&self, calendar_id: &str, event: Event) -> BoxFuture<'_, Event> {
        let result = self.insert(calendar_id, event);
        Box::pin(async move { result })
    }

    fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: Event,
    ) -> BoxFuture<'_, Event> {
        let result = self.update(calendar_id, event_id, event);
        Box::pin(async move { result })
    }

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, ()> {
        let result = self.delete(calendar_id, event_id);
        Box::pin(async move { result })
    }

    fn list_events(&self, calendar_id: &str, query: ListEventsQuery) -> BoxFuture<'_, Events> {
        let result = self.list(calendar_id, query);
        Box::pin(async move { result })
    }
}
