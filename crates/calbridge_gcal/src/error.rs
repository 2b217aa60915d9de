// File: crates/calbridge_gcal/src/error.rs
use calbridge_common::CalbridgeError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Classification of a failed Google Calendar request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteErrorKind {
    /// Credentials rejected (expired or revoked refresh token, bad client).
    Auth,
    /// Authenticated, but not allowed to touch this calendar or event.
    Permission,
    /// Calendar or event does not exist (or was already deleted).
    NotFound,
    /// Quota or rate limit exceeded.
    RateLimited,
    /// The request itself was refused, e.g. a malformed payload.
    Rejected,
    /// Google answered with a 5xx.
    Server,
    /// The request never got an HTTP answer.
    Transport,
    /// The answer could not be decoded.
    Decode,
}

/// `reason` values Google sends with a 403 that mean "slow down", not "forbidden".
const RATE_LIMIT_REASONS: &[&str] = &[
    "rateLimitExceeded",
    "userRateLimitExceeded",
    "quotaExceeded",
    "dailyLimitExceeded",
];

impl RemoteErrorKind {
    /// Classifies an HTTP status plus the optional Google error `reason`.
    pub fn from_status(status: u16, reason: Option<&str>) -> Self {
        match status {
            401 => RemoteErrorKind::Auth,
            403 if reason.is_some_and(|r| RATE_LIMIT_REASONS.contains(&r)) => {
                RemoteErrorKind::RateLimited
            }
            403 => RemoteErrorKind::Permission,
            404 | 410 => RemoteErrorKind::NotFound,
            429 => RemoteErrorKind::RateLimited,
            500..=599 => RemoteErrorKind::Server,
            _ => RemoteErrorKind::Rejected,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            RemoteErrorKind::Auth => "auth",
            RemoteErrorKind::Permission => "permission",
            RemoteErrorKind::NotFound => "not_found",
            RemoteErrorKind::RateLimited => "rate_limited",
            RemoteErrorKind::Rejected => "rejected",
            RemoteErrorKind::Server => "server",
            RemoteErrorKind::Transport => "transport",
            RemoteErrorKind::Decode => "decode",
        }
    }
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur when talking to Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google Calendar request failed ({kind}): {message}")]
    Remote {
        kind: RemoteErrorKind,
        status: Option<u16>,
        message: String,
    },
    #[error("Missing Google Calendar configuration: {0}")]
    MissingConfig(&'static str),
    #[error("Failed to build Google Calendar client: {0}")]
    ClientSetup(String),
    #[error("Invalid event payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("OAuth token exchange failed: {0}")]
    TokenExchange(String),
}

impl GcalServiceError {
    /// Builds a remote error from a status code, as Google would report it.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        GcalServiceError::Remote {
            kind: RemoteErrorKind::from_status(status, None),
            status: Some(status),
            message: message.into(),
        }
    }

    /// The remote classification, if this error came from a request.
    pub fn kind(&self) -> Option<RemoteErrorKind> {
        match self {
            GcalServiceError::Remote { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Reads `error.code` and `error.errors[0].reason` from a Google error body.
fn status_and_reason(body: &Value) -> (Option<u16>, Option<&str>) {
    let status = body
        .pointer("/error/code")
        .and_then(Value::as_u64)
        .and_then(|code| u16::try_from(code).ok());
    let reason = body
        .pointer("/error/errors/0/reason")
        .and_then(Value::as_str);
    (status, reason)
}

impl From<google_calendar3::Error> for GcalServiceError {
    fn from(err: google_calendar3::Error) -> Self {
        use google_calendar3::Error;

        let (kind, status) = match &err {
            Error::BadRequest(body) => {
                let (status, reason) = status_and_reason(body);
                let kind = status
                    .map(|s| RemoteErrorKind::from_status(s, reason))
                    .unwrap_or(RemoteErrorKind::Rejected);
                (kind, status)
            }
            Error::Failure(response) => {
                let status = response.status().as_u16();
                (RemoteErrorKind::from_status(status, None), Some(status))
            }
            Error::HttpError(_) | Error::Io(_) => (RemoteErrorKind::Transport, None),
            Error::MissingToken(_) | Error::MissingAPIKey => (RemoteErrorKind::Auth, None),
            Error::JsonDecodeError(..) => (RemoteErrorKind::Decode, None),
            _ => (RemoteErrorKind::Rejected, None),
        };

        GcalServiceError::Remote {
            kind,
            status,
            message: err.to_string(),
        }
    }
}

impl From<GcalServiceError> for CalbridgeError {
    fn from(err: GcalServiceError) -> Self {
        let message = err.to_string();
        match err {
            GcalServiceError::Remote { kind, .. } => match kind {
                RemoteErrorKind::Auth => CalbridgeError::AuthError(message),
                RemoteErrorKind::Permission => CalbridgeError::PermissionError(message),
                RemoteErrorKind::NotFound => CalbridgeError::NotFoundError(message),
                RemoteErrorKind::RateLimited => CalbridgeError::RateLimitError(message),
                RemoteErrorKind::Rejected => CalbridgeError::ValidationError(message),
                RemoteErrorKind::Server | RemoteErrorKind::Transport | RemoteErrorKind::Decode => {
                    calbridge_common::external_service_error("Google Calendar", message)
                }
            },
            GcalServiceError::MissingConfig(_) => CalbridgeError::ConfigError(message),
            GcalServiceError::ClientSetup(_) => CalbridgeError::InternalError(message),
            GcalServiceError::InvalidPayload(_) => CalbridgeError::ValidationError(message),
            GcalServiceError::TokenExchange(_) => {
                calbridge_common::external_service_error("Google OAuth", message)
            }
        }
    }
}
