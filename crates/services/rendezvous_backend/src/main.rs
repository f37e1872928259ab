use rendezvous_backend::{build_router, AppState};
use rendezvous_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    rendezvous_common::logging::init();

    let config = Arc::new(load_config()?);
    info!(
        use_gcal = config.use_gcal,
        use_stripe = config.use_stripe,
        use_mail = config.use_mail,
        use_fulfillment = config.use_fulfillment,
        services = config.services.len(),
        "Configuration loaded"
    );

    let state = AppState::from_config(config.clone()).await?;
    let app = build_router(&state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
