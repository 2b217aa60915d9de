// --- File: crates/calbridge_gcal/src/client.rs ---
//! The calendar adapter.
//!
//! Every operation comes in two flavours. The `try_*` methods return a
//! classified [`GcalServiceError`]; the plain methods collapse failures into
//! `None`, `false` or an empty list. Both log exactly once per call.

use std::sync::Arc;

use calbridge_config::GcalConfig;
use chrono::{DateTime, Utc};
use google_calendar3::api::Event;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::auth::create_calendar_hub;
use crate::error::GcalServiceError;
use crate::service::{CalendarService, GoogleCalendarService, ListEventsQuery};

/// Event body sent to Google, in the remote schema.
pub type EventPayload = Event;
/// Event as stored by Google, returned untouched.
pub type EventRecord = Event;

/// Converts a loosely typed JSON object into an event payload.
pub fn payload_from_json(value: Value) -> Result<EventPayload, GcalServiceError> {
    Ok(serde_json::from_value(value)?)
}

fn event_id(record: &EventRecord) -> &str {
    record.id.as_deref().unwrap_or("<none>")
}

#[derive(Clone)]
pub struct CalendarClientAdapter {
    service: Arc<dyn CalendarService>,
}

impl CalendarClientAdapter {
    /// Builds an authenticated session from client credentials and a refresh token.
    ///
    /// Fails on missing credentials or when the TLS roots cannot be loaded.
    /// Nothing is sent over the network until the first operation.
    pub async fn initialize(
        config: &GcalConfig,
        refresh_token: &str,
    ) -> Result<Self, GcalServiceError> {
        let hub = create_calendar_hub(config, refresh_token).await?;
        info!("Google Calendar client initialized");
        Ok(Self::with_service(Arc::new(GoogleCalendarService::new(
            Arc::new(hub),
        ))))
    }

    /// Like [`initialize`](Self::initialize), taking the refresh token from the config.
    pub async fn from_config(config: &GcalConfig) -> Result<Self, GcalServiceError> {
        let refresh_token = config
            .refresh_token
            .as_deref()
            .ok_or(GcalServiceError::MissingConfig("refresh_token"))?;
        Self::initialize(config, refresh_token).await
    }

    pub fn with_service(service: Arc<dyn CalendarService>) -> Self {
        Self { service }
    }

    pub async fn try_create_event(
        &self,
        calendar_id: &str,
        payload: EventPayload,
    ) -> Result<EventRecord, GcalServiceError> {
        match self.service.insert_event(calendar_id, payload).await {
            Ok(record) => {
                info!("Event created: {}", event_id(&record));
                Ok(record)
            }
            Err(e) => {
                error!("Error creating event in calendar {}: {}", calendar_id, e);
                Err(e)
            }
        }
    }

    pub async fn try_update_event(
        &self,
        calendar_id: &str,
        event_id_to_update: &str,
        payload: EventPayload,
    ) -> Result<EventRecord, GcalServiceError> {
        match self
            .service
            .update_event(calendar_id, event_id_to_update, payload)
            .await
        {
            Ok(record) => {
                info!("Event updated: {}", event_id(&record));
                Ok(record)
            }
            Err(e) => {
                error!("Error updating event {}: {}", event_id_to_update, e);
                Err(e)
            }
        }
    }

    pub async fn try_delete_event(
        &self,
        calendar_id: &str,
        event_id_to_delete: &str,
    ) -> Result<(), GcalServiceError> {
        match self
            .service
            .delete_event(calendar_id, event_id_to_delete)
            .await
        {
            Ok(()) => {
                info!("Event deleted: {}", event_id_to_delete);
                Ok(())
            }
            Err(e) => {
                error!("Error deleting event {}: {}", event_id_to_delete, e);
                Err(e)
            }
        }
    }

    /// Event instances starting in `[start, end)`, ascending by start.
    ///
    /// Only the first page is read.
    pub async fn try_list_events(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<EventRecord>, GcalServiceError> {
        let query = ListEventsQuery::expanded(start, end);
        match self.service.list_events(calendar_id, query).await {
            Ok(events) => {
                let items = events.items.unwrap_or_default();
                if events.next_page_token.is_some() {
                    warn!(
                        "Calendar {} has more events between {} and {}; only the first {} are returned",
                        calendar_id,
                        start,
                        end,
                        items.len()
                    );
                }
                info!("Listed {} events from calendar {}", items.len(), calendar_id);
                Ok(items)
            }
            Err(e) => {
                error!("Error listing events from calendar {}: {}", calendar_id, e);
                Err(e)
            }
        }
    }

    /// Returns `None` on any failure.
    pub async fn create_event(&self, calendar_id: &str, payload: EventPayload) -> Option<EventRecord> {
        self.try_create_event(calendar_id, payload).await.ok()
    }

    /// Returns `None` on any failure, including an unknown event id.
    pub async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        payload: EventPayload,
    ) -> Option<EventRecord> {
        self.try_update_event(calendar_id, event_id, payload)
            .await
            .ok()
    }

    pub async fn delete_event(&self, calendar_id: &str, event_id: &str) -> bool {
        self.try_delete_event(calendar_id, event_id).await.is_ok()
    }

    /// Returns an empty list on any failure.
    pub async fn list_events(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<EventRecord> {
        self.try_list_events(calendar_id, start, end)
            .await
            .unwrap_or_default()
    }
}
