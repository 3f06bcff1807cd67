//! Seatline HTTP server.
//!
//! # Usage
//!
//! ```bash
//! SEATLINE_CALLERS="root-token:1:admin,desk-token:100:operator" \
//!     cargo run --bin seatline-server
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use seatline_reservation::metrics::register_business_metrics;
use seatline_web::{build_router, AppState, Config};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::Notify;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,seatline=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Seatline server");

    // Load configuration
    let config = Config::from_env();
    info!(
        address = %config.server.bind_address(),
        default_total_seats = config.reservation.default_total_seats,
        max_seats_per_booking = ?config.reservation.max_seats_per_booking,
        cancel_policy = %config.reservation.cancel_policy,
        notify_timeout_ms = config.reservation.notify_timeout_ms,
        "Configuration loaded"
    );

    // Metrics
    let prometheus = PrometheusBuilder::new().install_recorder()?;
    register_business_metrics();

    let state = AppState::from_config(&config)?.with_metrics(prometheus);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
    info!(address = %config.server.bind_address(), "Server listening");

    // Graceful shutdown, bounded by SHUTDOWN_TIMEOUT
    let stop = Arc::new(Notify::new());
    let server = axum::serve(listener, app).with_graceful_shutdown({
        let stop = Arc::clone(&stop);
        async move { stop.notified().await }
    });
    let mut server = tokio::spawn(server.into_future());

    tokio::select! {
        joined = &mut server => {
            joined??;
            info!("Server stopped");
            return Ok(());
        }
        () = shutdown_signal() => {}
    }

    stop.notify_one();
    let drain = config.server.shutdown_timeout();
    match tokio::time::timeout(drain, server).await {
        Ok(joined) => joined??,
        Err(_) => warn!(
            timeout_secs = drain.as_secs(),
            "Shutdown timed out, dropping open connections"
        ),
    }

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
