// --- File: crates/calbridge_common/src/lib.rs ---

// Declare modules within this crate
pub mod error;     // Error handling
pub mod http;      // HTTP utilities
pub mod logging;   // Logging utilities
pub mod routes;    // Route definitions

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

// Re-export error types and utilities for easier access
pub use error::{
    CalbridgeError,
    HttpStatusCode,
    validation_error,
    external_service_error,
};

// Re-export HTTP utilities for easier access
pub use http::{
    IntoHttpResponse,
    client::{
        HTTP_CLIENT,
        create_client,
        post_form,
    },
};

// Re-export logging utilities for easier access
pub use logging::{
    init,
    init_with_level,
};
