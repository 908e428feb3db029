//! Honeytoken web server.
//!
//! ```text
//!     Client Request         ┌────────────────────────────────────────────────┐
//!     ───────────────────────┼─▶ classify ─▶ registry ─┬─ match ─▶ alert task ─┼──▶ Notifier
//!                            │   (uri, ip,   lookup    │          (detached)   │   (smtp/log)
//!                            │    headers,             │                       │
//!     Decoy Response         │    body)                ▼                       │
//!     ◀──────────────────────┼──────────────── decoy response (always) ────────│
//!                            └────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use honeytoken_server::cli::Args;
use honeytoken_server::config::{read_config, validate_config};
use honeytoken_server::lifecycle::Shutdown;
use honeytoken_server::notification;
use honeytoken_server::observability::{logging, metrics};
use honeytoken_server::registry::SqliteRegistry;
use honeytoken_server::TrapServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = read_config(&args.config)?;
    args.apply_overrides(&mut config);

    logging::init_logging(config.observability.verbose, config.observability.log_format);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        "honeytoken-server starting"
    );

    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            tracing::error!(%error, "Invalid configuration");
        }
        std::process::exit(1);
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = SqliteRegistry::open(&config.registry.database_url).await?;
    let notifier = notification::from_config(&config.smtp)?;

    tracing::info!(
        database_url = %config.registry.database_url,
        notifier = notifier.name(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.listener.socket_address()).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let _signals = shutdown.trigger_on_signal();

    let server = TrapServer::new(config, Arc::new(registry.clone()), notifier)?;
    server.run(listener, server_shutdown).await?;

    registry.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
