//! # Rental Marketplace
//!
//! Peer-to-peer rental marketplace backend.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Storage (PostgreSQL pool or in-memory store)
//! - HTTP server

use anyhow::Result;
use tracing::info;

use rental_marketplace::config::Settings;
use rental_marketplace::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    rental_marketplace::telemetry::init_tracing();

    info!("Starting Rental Marketplace...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        backend = ?settings.database.backend,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
