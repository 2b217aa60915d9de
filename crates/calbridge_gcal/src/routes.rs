// --- File: crates/calbridge_gcal/src/routes.rs ---

use crate::client::CalendarClientAdapter;
use crate::error::GcalServiceError;
use crate::handlers::{
    auth_url_handler, create_event_handler, delete_event_handler, list_events_handler,
    oauth_callback_handler, sync_events_handler, update_event_handler, GcalState,
};
use axum::{
    routing::{get, post, put},
    Router,
};
use calbridge_config::AppConfig;
use std::sync::Arc;
use tracing::warn;

/// Creates a router containing all routes for the Google Calendar feature.
///
/// Without a refresh token the event routes answer 503 and only the OAuth
/// routes are usable.
pub async fn routes(config: Arc<AppConfig>) -> Result<Router, GcalServiceError> {
    let gcal = config
        .gcal
        .as_ref()
        .ok_or(GcalServiceError::MissingConfig("gcal"))?;

    let adapter = match gcal.refresh_token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => Some(CalendarClientAdapter::initialize(gcal, token).await?),
        None => {
            warn!("No Google refresh token configured; visit /api/gcal/authurl to connect a calendar");
            None
        }
    };

    Ok(router(Arc::new(GcalState { config, adapter })))
}

pub fn router(state: Arc<GcalState>) -> Router {
    Router::new()
        .route(
            "/gcal/events",
            post(create_event_handler).get(list_events_handler),
        )
        .route(
            "/gcal/events/{event_id}",
            put(update_event_handler).delete(delete_event_handler),
        )
        .route("/gcal/authurl", get(auth_url_handler))
        .route("/gcal/oauth2callback", get(oauth_callback_handler))
        .route("/gcal/sync-events", post(sync_events_handler))
        .with_state(state)
}
