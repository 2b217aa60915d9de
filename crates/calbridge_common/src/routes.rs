// --- File: crates/calbridge_common/src/routes.rs ---

use axum::{routing::get, Router};

/// Liveness probe body.
pub const HEALTH_MESSAGE: &str = "Server is healthy";

/// Creates a router containing the routes shared by every deployment.
pub fn routes() -> Router {
    Router::new().route("/health", get(|| async { HEALTH_MESSAGE }))
}
