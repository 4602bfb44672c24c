//! Ticket Relay Server - Main Entry Point
//!
//! Relays ticketing-system webhooks to a chat webhook.

use anyhow::{Context, Result};
use tracing::{info, warn};

use ticket_relay::{api, config, relay::TicketRelay};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticket_relay=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Ticket Relay"
    );

    if !config.has_webhook() {
        warn!("DISCORD_WEBHOOK_URL is not set; every relay request will fail until it is configured");
    }

    let relay =
        TicketRelay::new(config.relay.clone()).context("Failed to build outbound HTTP client")?;

    // Build application state and router
    let state = api::AppState::new(config.clone(), relay);
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
