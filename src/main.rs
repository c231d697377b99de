//! # Followcheck
//!
//! A Rust web service exposing rate-limited Twitter/X follow verification to the
//! rest of the system.
//!
//! ## Environment Variables
//!
//! - `TWITTER_BEARER_TOKEN`: Twitter API Bearer Token (verification is disabled without it)
//! - `ANALYZER_TWITTER_ID` / `ANALYZER_TWITTER_USERNAME`: account whose followers are verified
//! - `PORT`: Server port (defaults to 3000)
//!
//! ## API Endpoints
//!
//! - `GET /health`: Returns service health status
//! - `GET /twitter/users/:username`: Resolves a username
//! - `GET /twitter/follows/:username`: Checks whether the user follows the target account
//! - `GET /twitter/validate/:username`: Validates username format

use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use followcheck::{build_router, get_server_port, TwitterClient, TwitterConfig};

/// Main entry point for the followcheck web service.
///
/// Initializes logging, loads the Twitter configuration, creates the single
/// client instance (and with it the throttled request queue) and serves HTTP
/// until Ctrl-C.
///
/// # Logging
///
/// Log levels can be controlled via the `RUST_LOG` environment variable.
///
/// ```bash
/// RUST_LOG=debug TWITTER_BEARER_TOKEN=... cargo run
/// ```
#[tokio::main]
async fn main() {
    // Initialize the logging system
    env_logger::init();

    let config = TwitterConfig::from_env();
    let client = Arc::new(TwitterClient::new(config));

    let app = build_router(client).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let port = get_server_port();
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    info!("Starting followcheck server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("HTTP server error: {}", e);
    }

    info!("Followcheck server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
