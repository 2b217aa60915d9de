// --- File: crates/calbridge_gcal/src/logic.rs ---
use calbridge_common::{validation_error, CalbridgeError};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use google_calendar3::api::Event;
use serde::{Deserialize, Serialize};

use crate::sync::{EventRow, SkippedRow};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

// --- Data Structures ---
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ListEventsParams {
    /// Inclusive lower bound, RFC 3339 or YYYY-MM-DD
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-01T00:00:00Z"))]
    pub start: String,

    /// Exclusive upper bound, RFC 3339 or YYYY-MM-DD
    #[cfg_attr(feature = "openapi", schema(example = "2025-06-01"))]
    pub end: String,

    /// Defaults to the configured calendar
    pub calendar_id: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct CalendarQuery {
    pub calendar_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EventsResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<crate::doc::EventSchema>))]
    pub events: Vec<Event>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    /// Set by Google when the user denied access
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct OAuthCallbackResponse {
    pub message: String,
    pub refresh_token_received: bool,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SyncRequest {
    pub rows: Vec<EventRow>,
    /// Used for rows without a Calendar column value
    pub calendar_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SyncResponse {
    #[cfg_attr(feature = "openapi", schema(example = "success"))]
    pub status: String,
    pub synced: usize,
    pub skipped: Vec<SkippedRow>,
    pub rows: Vec<EventRow>,
}

// --- Time bounds ---

/// Accepts RFC 3339 timestamps and plain dates (midnight UTC).
pub fn parse_time_bound(value: &str, name: &str) -> Result<DateTime<Utc>, CalbridgeError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| {
            validation_error(format!(
                "Invalid {name} '{value}' (expected RFC 3339 or YYYY-MM-DD)"
            ))
        })
}

pub fn parse_time_range(
    start: &str,
    end: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>), CalbridgeError> {
    let start = parse_time_bound(start, "start")?;
    let end = parse_time_bound(end, "end")?;
    if end <= start {
        return Err(validation_error("end must be after start"));
    }
    Ok((start, end))
}
