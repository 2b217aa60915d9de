// --- File: crates/calbridge_gcal/src/test_support.rs ---
//! Helpers shared by the unit tests of this crate.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use google_calendar3::api::{Event, EventDateTime};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::Registry;

/// Records every log entry emitted by this crate while installed.
#[derive(Clone, Default)]
pub struct LogCounter {
    entries: Arc<Mutex<Vec<(Level, String)>>>,
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for LogCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if !meta.target().starts_with("calbridge_gcal") {
            return;
        }
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.entries.lock().unwrap().push((*meta.level(), visitor.0));
    }
}

impl LogCounter {
    /// Installs the counter as the subscriber of the current thread.
    pub fn install() -> (Self, DefaultGuard) {
        let counter = Self::default();
        let guard = tracing::subscriber::set_default(Registry::default().with(counter.clone()));
        (counter, guard)
    }

    pub fn count(&self, level: Level) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .count()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn timed_event(summary: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
    Event {
        summary: Some(summary.to_string()),
        start: Some(EventDateTime {
            date_time: Some(start),
            time_zone: Some("UTC".to_string()),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date_time: Some(end),
            time_zone: Some("UTC".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}
