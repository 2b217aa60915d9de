// File: crates/calbridge_gcal/src/handlers.rs
use crate::client::{payload_from_json, CalendarClientAdapter, EventRecord};
use crate::logic::{
    parse_time_range, AuthUrlResponse, CalendarQuery, DeleteResponse, EventsResponse,
    ListEventsParams, OAuthCallbackQuery, OAuthCallbackResponse, SyncRequest, SyncResponse,
};
use crate::{oauth, sync};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use calbridge_common::{validation_error, CalbridgeError};
use calbridge_config::{AppConfig, GcalConfig};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

// Define shared state needed by GCal handlers
#[derive(Clone)]
pub struct GcalState {
    pub config: Arc<AppConfig>,
    /// `None` until a refresh token is configured; the OAuth routes still work.
    pub adapter: Option<CalendarClientAdapter>,
}

impl GcalState {
    fn gcal_config(&self) -> Result<&GcalConfig, CalbridgeError> {
        if !self.config.use_gcal {
            return Err(CalbridgeError::ServiceUnavailable(
                "GCal service is disabled.".to_string(),
            ));
        }
        self.config.gcal.as_ref().ok_or_else(|| {
            CalbridgeError::ConfigError("GCal config missing.".to_string())
        })
    }

    fn adapter(&self) -> Result<&CalendarClientAdapter, CalbridgeError> {
        self.gcal_config()?;
        self.adapter.as_ref().ok_or_else(|| {
            CalbridgeError::ServiceUnavailable(
                "Google Calendar is not connected; complete the OAuth flow and set GOOGLE_REFRESH_TOKEN.".to_string(),
            )
        })
    }

    fn calendar_id(&self, requested: Option<String>) -> Result<String, CalbridgeError> {
        let gcal = self.gcal_config()?;
        Ok(requested
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| gcal.calendar_id_or_default().to_string()))
    }
}

/// Handler to create an event.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/gcal/events",
    params(CalendarQuery),
    request_body(content = crate::doc::EventSchema, description = "Event in the Google Calendar v3 schema"),
    responses(
        (status = 201, description = "Created event as stored by Google", body = crate::doc::EventSchema),
        (status = 400, description = "Payload rejected"),
        (status = 502, description = "Google Calendar failed")
    ),
    tag = "GCal"
))]
pub async fn create_event_handler(
    State(state): State<Arc<GcalState>>,
    Query(query): Query<CalendarQuery>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<EventRecord>), CalbridgeError> {
    let adapter = state.adapter()?;
    let calendar_id = state.calendar_id(query.calendar_id)?;
    let payload = payload_from_json(body)?;

    let record = adapter.try_create_event(&calendar_id, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler to list event instances in a time window.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/gcal/events",
    params(ListEventsParams),
    responses(
        (status = 200, description = "Event instances ordered by start time", body = EventsResponse),
        (status = 400, description = "Invalid time range")
    ),
    tag = "GCal"
))]
pub async fn list_events_handler(
    State(state): State<Arc<GcalState>>,
    Query(params): Query<ListEventsParams>,
) -> Result<Json<EventsResponse>, CalbridgeError> {
    let adapter = state.adapter()?;
    let (start, end) = parse_time_range(&params.start, &params.end)?;
    let calendar_id = state.calendar_id(params.calendar_id)?;

    let events = adapter.try_list_events(&calendar_id, start, end).await?;
    Ok(Json(EventsResponse { events }))
}

/// Handler to replace an existing event.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/gcal/events/{event_id}",
    params(
        ("event_id" = String, Path, description = "The ID of the event to replace"),
        CalendarQuery
    ),
    request_body(content = crate::doc::EventSchema, description = "Event in the Google Calendar v3 schema"),
    responses(
        (status = 200, description = "Updated event", body = crate::doc::EventSchema),
        (status = 404, description = "Event not found")
    ),
    tag = "GCal"
))]
pub async fn update_event_handler(
    State(state): State<Arc<GcalState>>,
    Path(event_id): Path<String>,
    Query(query): Query<CalendarQuery>,
    Json(body): Json<Value>,
) -> Result<Json<EventRecord>, CalbridgeError> {
    let adapter = state.adapter()?;
    let calendar_id = state.calendar_id(query.calendar_id)?;
    let payload = payload_from_json(body)?;

    let record = adapter
        .try_update_event(&calendar_id, &event_id, payload)
        .await?;
    Ok(Json(record))
}

/// Handler to delete an event.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/gcal/events/{event_id}",
    params(
        ("event_id" = String, Path, description = "The ID of the event to delete"),
        CalendarQuery
    ),
    responses(
        (status = 200, description = "Event deleted", body = DeleteResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "GCal"
))]
pub async fn delete_event_handler(
    State(state): State<Arc<GcalState>>,
    Path(event_id): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<DeleteResponse>, CalbridgeError> {
    let adapter = state.adapter()?;
    let calendar_id = state.calendar_id(query.calendar_id)?;

    adapter.try_delete_event(&calendar_id, &event_id).await?;
    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Event {event_id} deleted."),
    }))
}

/// Handler returning the Google consent URL.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/gcal/authurl",
    responses((status = 200, description = "Consent screen URL", body = AuthUrlResponse)),
    tag = "GCal"
))]
pub async fn auth_url_handler(
    State(state): State<Arc<GcalState>>,
) -> Result<Json<AuthUrlResponse>, CalbridgeError> {
    let auth_url = oauth::consent_url(state.gcal_config()?)?;
    Ok(Json(AuthUrlResponse { auth_url }))
}

/// Handler Google redirects to after consent.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/gcal/oauth2callback",
    params(OAuthCallbackQuery),
    responses(
        (status = 200, description = "Authorization complete", body = OAuthCallbackResponse),
        (status = 401, description = "User denied access"),
        (status = 502, description = "Token exchange failed")
    ),
    tag = "GCal"
))]
pub async fn oauth_callback_handler(
    State(state): State<Arc<GcalState>>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Json<OAuthCallbackResponse>, CalbridgeError> {
    let gcal = state.gcal_config()?;
    if let Some(error) = query.error {
        warn!("OAuth consent was not granted: {}", error);
        return Err(CalbridgeError::AuthError(format!("Authorization failed: {error}")));
    }
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| validation_error("Missing 'code' query parameter"))?;

    let tokens = oauth::exchange_code(gcal, &code).await?;
    let refresh_token_received = match tokens.refresh_token.as_deref() {
        Some(token) => {
            info!("Save this refresh token: GOOGLE_REFRESH_TOKEN={}", token);
            true
        }
        None => false,
    };

    Ok(Json(OAuthCallbackResponse {
        message: "Authorization complete. Check your server logs for the token.".to_string(),
        refresh_token_received,
    }))
}

/// Handler to push event rows to the calendar.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/gcal/sync-events",
    request_body = SyncRequest,
    responses((status = 200, description = "Sync summary", body = SyncResponse)),
    tag = "GCal"
))]
pub async fn sync_events_handler(
    State(state): State<Arc<GcalState>>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, CalbridgeError> {
    let adapter = state.adapter()?;
    let default_calendar = state.calendar_id(request.calendar_id)?;

    let outcome = sync::sync_rows(adapter, request.rows, &default_calendar, Utc::now()).await;
    Ok(Json(SyncResponse {
        status: "success".to_string(),
        synced: outcome.synced,
        skipped: outcome.skipped,
        rows: outcome.rows,
    }))
}
