// --- File: crates/calbridge_gcal/src/sync.rs ---
//! Pushes tabular event rows (one row per event, spreadsheet style) to Google
//! Calendar.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use google_calendar3::api::{Event, EventDateTime};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::client::CalendarClientAdapter;

pub const SKIP_INCOMPLETE: &str = "Missing required fields or status=canceled";
pub const SKIP_ALREADY_SYNCED: &str = "Already synced";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// One event row. Column names match the sheet headers.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct EventRow {
    #[serde(rename = "ID")]
    pub id: String,
    pub summary: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub recurrence: String,
    pub time_zone: String,
    pub status: String,
    pub calendar: String,
    pub synced: String,
    pub last_synced_at: String,
    pub notes: String,
}

impl EventRow {
    fn is_incomplete_or_canceled(&self) -> bool {
        let canceled = self.status.eq_ignore_ascii_case("canceled")
            || self.status.eq_ignore_ascii_case("cancelled");
        self.summary.trim().is_empty()
            || self.start.trim().is_empty()
            || self.end.trim().is_empty()
            || canceled
    }

    fn is_synced(&self) -> bool {
        self.synced.trim().eq_ignore_ascii_case("TRUE")
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedRow {
    /// Zero-based position of the row in the submitted batch.
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOutcome {
    pub synced: usize,
    pub skipped: Vec<SkippedRow>,
    /// The submitted rows; synced ones carry their event ID and sync stamp.
    pub rows: Vec<EventRow>,
}

/// Parses a row timestamp. Values without an offset are read in `time_zone`
/// (an IANA name), falling back to UTC.
pub fn parse_row_time(value: &str, time_zone: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| format!("Invalid time value: {value}"))?;

    match time_zone.trim().parse::<Tz>() {
        Ok(tz) => tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| format!("Time {value} does not exist in {time_zone}")),
        Err(_) => Ok(naive.and_utc()),
    }
}

/// Event body for a row: UTC start/end, the row's time zone (default `UTC`)
/// and at most one recurrence rule.
pub fn build_event_payload(row: &EventRow) -> Result<Event, String> {
    let time_zone = match row.time_zone.trim() {
        "" => "UTC".to_string(),
        tz => tz.to_string(),
    };
    let start = parse_row_time(&row.start, &time_zone)?;
    let end = parse_row_time(&row.end, &time_zone)?;

    let description = Some(row.description.clone()).filter(|d| !d.is_empty());
    let recurrence = Some(row.recurrence.trim())
        .filter(|r| !r.is_empty())
        .map(|r| vec![r.to_string()]);

    Ok(Event {
        summary: Some(row.summary.clone()),
        description,
        start: Some(EventDateTime {
            date_time: Some(start),
            time_zone: Some(time_zone.clone()),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date_time: Some(end),
            time_zone: Some(time_zone),
            ..Default::default()
        }),
        recurrence,
        ..Default::default()
    })
}

/// Creates or updates one event per eligible row, in order.
///
/// A failing row is reported in `skipped` and does not stop the batch.
pub async fn sync_rows(
    adapter: &CalendarClientAdapter,
    rows: Vec<EventRow>,
    default_calendar: &str,
    now: DateTime<Utc>,
) -> SyncOutcome {
    let mut outcome = SyncOutcome {
        rows,
        ..Default::default()
    };

    for index in 0..outcome.rows.len() {
        let row = &outcome.rows[index];
        if row.is_incomplete_or_canceled() {
            outcome.skipped.push(SkippedRow {
                row: index,
                reason: SKIP_INCOMPLETE.to_string(),
            });
            continue;
        }
        if row.is_synced() {
            outcome.skipped.push(SkippedRow {
                row: index,
                reason: SKIP_ALREADY_SYNCED.to_string(),
            });
            continue;
        }

        match push_row(adapter, row, default_calendar).await {
            Ok(event_id) => {
                let row = &mut outcome.rows[index];
                if let Some(id) = event_id {
                    row.id = id;
                }
                row.synced = "TRUE".to_string();
                row.last_synced_at = now.to_rfc3339();
                outcome.synced += 1;
            }
            Err(message) => {
                error!("Event sync failed (row {}): {}", index, message);
                outcome.skipped.push(SkippedRow {
                    row: index,
                    reason: format!("Event insert/update error: {message}"),
                });
            }
        }
    }

    info!(
        "Sync completed: {} synced, {} skipped",
        outcome.synced,
        outcome.skipped.len()
    );
    outcome
}

/// Returns the id of a newly inserted event, `None` after an update.
async fn push_row(
    adapter: &CalendarClientAdapter,
    row: &EventRow,
    default_calendar: &str,
) -> Result<Option<String>, String> {
    let payload = build_event_payload(row)?;
    let calendar_id = match row.calendar.trim() {
        "" => default_calendar,
        calendar => calendar,
    };

    if row.id.trim().is_empty() {
        let created = adapter
            .try_create_event(calendar_id, payload)
            .await
            .map_err(|e| e.to_string())?;
        Ok(Some(created.id.unwrap_or_default()))
    } else {
        adapter
            .try_update_event(calendar_id, row.id.trim(), payload)
            .await
            .map_err(|e| e.to_string())?;
        Ok(None)
    }
}
