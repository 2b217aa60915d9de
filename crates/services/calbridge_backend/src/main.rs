// File: services/calbridge_backend/src/main.rs
use calbridge_config::load_config;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

mod app;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    calbridge_common::logging::init();

    let config = Arc::new(load_config()?);
    let app = app::build_app(config.clone()).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
