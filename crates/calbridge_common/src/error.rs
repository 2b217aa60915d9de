// --- File: crates/calbridge_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all calbridge crates.
///
/// Feature crates convert their own errors into this type (via `From`) when
/// they cross an HTTP boundary.
#[derive(Error, Debug)]
pub enum CalbridgeError {
    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during authentication
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// The caller is authenticated but not allowed to do this
    #[error("Permission denied: {0}")]
    PermissionError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to rate limiting
    #[error("Rate limited: {0}")]
    RateLimitError(String),

    /// The feature is disabled or not set up yet
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for CalbridgeError {
    fn status_code(&self) -> u16 {
        match self {
            CalbridgeError::ConfigError(_) => 500,
            CalbridgeError::AuthError(_) => 401,
            CalbridgeError::PermissionError(_) => 403,
            CalbridgeError::ValidationError(_) => 400,
            CalbridgeError::ExternalServiceError { .. } => 502,
            CalbridgeError::NotFoundError(_) => 404,
            CalbridgeError::RateLimitError(_) => 429,
            CalbridgeError::ServiceUnavailable(_) => 503,
            CalbridgeError::InternalError(_) => 500,
        }
    }
}

pub fn validation_error<T: fmt::Display>(message: T) -> CalbridgeError {
    CalbridgeError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> CalbridgeError {
    CalbridgeError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
