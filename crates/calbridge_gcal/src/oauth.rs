// --- File: crates/calbridge_gcal/src/oauth.rs ---
//! One-off OAuth consent flow used to obtain the refresh token the adapter
//! runs on.

use calbridge_common::post_form;
use calbridge_config::GcalConfig;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::auth::CALENDAR_SCOPE;
use crate::error::GcalServiceError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Only present when the user went through the consent screen.
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

fn client_id(config: &GcalConfig) -> Result<&str, GcalServiceError> {
    config
        .client_id
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(GcalServiceError::MissingConfig("client_id"))
}

fn redirect_uri(config: &GcalConfig) -> Result<&str, GcalServiceError> {
    config
        .redirect_uri
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(GcalServiceError::MissingConfig("redirect_uri"))
}

/// URL of the Google consent screen.
///
/// Offline access and a forced consent prompt make Google hand out a
/// refresh token on every exchange.
pub fn consent_url(config: &GcalConfig) -> Result<String, GcalServiceError> {
    let params = [
        ("client_id", client_id(config)?),
        ("redirect_uri", redirect_uri(config)?),
        ("response_type", "code"),
        ("scope", CALENDAR_SCOPE),
        ("access_type", "offline"),
        ("prompt", "consent"),
    ];
    let query = serde_urlencoded::to_string(params)
        .map_err(|e| GcalServiceError::ClientSetup(e.to_string()))?;
    Ok(format!("{}?{}", config.auth_uri_or_default(), query))
}

/// Exchanges an authorization code for tokens at the configured token endpoint.
pub async fn exchange_code(
    config: &GcalConfig,
    code: &str,
) -> Result<TokenResponse, GcalServiceError> {
    if code.trim().is_empty() {
        return Err(GcalServiceError::TokenExchange(
            "authorization code is empty".to_string(),
        ));
    }
    let client_secret = config
        .client_secret
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(GcalServiceError::MissingConfig("client_secret"))?;

    let form = [
        ("code", code),
        ("client_id", client_id(config)?),
        ("client_secret", client_secret),
        ("redirect_uri", redirect_uri(config)?),
        ("grant_type", "authorization_code"),
    ];

    let response = post_form(config.token_uri_or_default(), &form)
        .await
        .map_err(|e| {
            error!("Token endpoint unreachable: {}", e);
            GcalServiceError::TokenExchange(e.to_string())
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("Token exchange rejected: HTTP {} - {}", status, body);
        return Err(GcalServiceError::TokenExchange(format!(
            "HTTP {} - {}",
            status.as_u16(),
            body
        )));
    }

    let tokens: TokenResponse = response
        .json()
        .await
        .map_err(|e| GcalServiceError::TokenExchange(e.to_string()))?;

    if tokens.refresh_token.is_some() {
        info!("Token exchange succeeded, refresh token received");
    } else {
        warn!("Token exchange succeeded without a refresh token; revoke access and consent again");
    }
    Ok(tokens)
}
