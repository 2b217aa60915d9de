// --- File: crates/calbridge_gcal/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod client;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod mock;
pub mod oauth;
pub mod routes;
pub mod service;
pub mod sync;
#[cfg(test)]
mod test_support;

pub use client::{payload_from_json, CalendarClientAdapter, EventPayload, EventRecord};
pub use error::{GcalServiceError, RemoteErrorKind};
