// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar Alarm API Server
//!
//! Lets users sign in with Google, browse upcoming calendar events, and set
//! custom alarm lead times per event.

use calendar_alarm::{config::Config, db::Store, services::GoogleClient, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Calendar Alarm API");

    if !config.oauth_configured() {
        tracing::warn!("GOOGLE_CLIENT_ID is not set; login will fail until it is configured");
    }

    // Connect the document store
    let store = Store::connect(&config).await?;

    // Google OAuth + Calendar client
    let google = Arc::new(GoogleClient::new(&config)?);
    tracing::info!(
        timeout_secs = config.http_timeout.as_secs(),
        max_retries = config.http_max_retries,
        "Google client initialized"
    );

    let state = Arc::new(AppState::new(config.clone(), store, google));

    // Build router
    let app = calendar_alarm::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("calendar_alarm=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}

/// Resolve on Ctrl-C so in-flight requests can finish.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
