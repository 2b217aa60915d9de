// File: crates/calbridge_gcal/src/auth.rs
use crate::error::GcalServiceError;
use calbridge_config::GcalConfig;
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{authorized_user::AuthorizedUserSecret, AuthorizedUserAuthenticator},
    CalendarHub,
};

/// Full read/write access to the user's calendars.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

fn require_field<'a>(
    value: Option<&'a str>,
    name: &'static str,
) -> Result<&'a str, GcalServiceError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(GcalServiceError::MissingConfig(name)),
    }
}

/// Builds the "authorized user" credential yup-oauth2 refreshes access tokens with.
pub fn authorized_user_secret(
    config: &GcalConfig,
    refresh_token: &str,
) -> Result<AuthorizedUserSecret, GcalServiceError> {
    let client_id = require_field(config.client_id.as_deref(), "client_id")?;
    let client_secret = require_field(config.client_secret.as_deref(), "client_secret")?;
    let refresh_token = require_field(Some(refresh_token), "refresh_token")?;

    Ok(AuthorizedUserSecret {
        client_id: client_id.to_string(),
        client_secret: client_secret.to_string(),
        refresh_token: refresh_token.to_string(),
        key_type: "authorized_user".to_string(),
    })
}

/// Creates a Calendar v3 hub authenticated with a stored refresh token.
///
/// No request is sent here; the first access token is fetched lazily by
/// the first API call.
pub async fn create_calendar_hub(
    config: &GcalConfig,
    refresh_token: &str,
) -> Result<HubType, GcalServiceError> {
    let secret = authorized_user_secret(config, refresh_token)?;

    let auth = AuthorizedUserAuthenticator::builder(secret)
        .build()
        .await
        .map_err(|e| GcalServiceError::ClientSetup(e.to_string()))?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| GcalServiceError::ClientSetup(e.to_string()))?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(CalendarHub::new(client, auth))
}
