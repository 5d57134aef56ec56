//! ShareIt Gateway - validates requests and relays them to the server

use std::net::SocketAddr;

use anyhow::Context;

use shareit::{
    config::AppConfig,
    gateway::{self, GatewayState, ServerClient},
    logging, with_middleware,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging);

    let client = ServerClient::new(&config.gateway).context("Failed to build HTTP client")?;
    tracing::info!(
        "Starting ShareIt Gateway v{}, forwarding to {}",
        env!("CARGO_PKG_VERSION"),
        client.base_url()
    );

    let app = with_middleware(gateway::router(GatewayState { client }));

    let addr = SocketAddr::new(
        config.gateway.host.parse().context("Invalid host address")?,
        config.gateway.port,
    );
    tracing::info!("Gateway listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
