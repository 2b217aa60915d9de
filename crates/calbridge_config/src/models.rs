// --- File: crates/calbridge_config/src/models.rs ---

use serde::{Deserialize, Serialize};

/// Standard Google OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
/// Standard Google OAuth2 consent endpoint.
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Calendar used when neither the caller nor the config names one.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Google Calendar Config ---
// Client identity is configured once per deployment. Secrets are usually
// given as "secret_from_env" in the config file and resolved at load time.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    #[serde(default)]
    pub client_id: Option<String>, // GOOGLE_CLIENT_ID
    #[serde(default)]
    pub client_secret: Option<String>, // GOOGLE_CLIENT_SECRET
    #[serde(default)]
    pub redirect_uri: Option<String>, // GOOGLE_REDIRECT_URI
    #[serde(default)]
    pub refresh_token: Option<String>, // GOOGLE_REFRESH_TOKEN
    #[serde(default)]
    pub calendar_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub auth_uri: Option<String>,
}

impl GcalConfig {
    /// Calendar to use when a request does not name one.
    pub fn calendar_id_or_default(&self) -> &str {
        self.calendar_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_CALENDAR_ID)
    }

    pub fn token_uri_or_default(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }

    pub fn auth_uri_or_default(&self) -> &str {
        self.auth_uri.as_deref().unwrap_or(DEFAULT_AUTH_URI)
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,

    #[serde(default)]
    pub gcal: Option<GcalConfig>,
}
