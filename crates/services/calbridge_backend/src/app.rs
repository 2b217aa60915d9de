// File: services/calbridge_backend/src/app.rs
use axum::{routing::get, Router};
use calbridge_config::AppConfig;
use std::error::Error;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Assembles the full application router.
///
/// `/health` sits at the root; feature routes are nested under `/api`.
pub async fn build_app(config: Arc<AppConfig>) -> Result<Router, Box<dyn Error + Send + Sync>> {
    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut api_router = Router::new().route("/", get(|| async { "Welcome to the calbridge API!" }));

    #[cfg(feature = "gcal")]
    {
        if config.use_gcal {
            let gcal_router = calbridge_gcal::routes::routes(config.clone()).await?;
            api_router = api_router.merge(gcal_router);
        } else {
            info!("Google Calendar routes disabled (use_gcal = false)");
        }
    }
    #[cfg(not(feature = "gcal"))]
    info!("Built without the gcal feature; use_gcal = {} is ignored", config.use_gcal);

    #[allow(unused_mut)]
    let mut app = calbridge_common::routes().nest("/api", api_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        #[cfg(feature = "gcal")]
        use calbridge_gcal::doc::GcalApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "calbridge API",
                version = "0.1.0",
                description = "Google Calendar bridge service",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        #[allow(unused_mut)]
        let mut openapi_doc = ApiDoc::openapi();
        #[cfg(feature = "gcal")]
        openapi_doc.merge(GcalApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    Ok(app.layer(TraceLayer::new_for_http()))
}
