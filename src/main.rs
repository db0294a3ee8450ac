//! Route planning widget service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser tab                ┌──────────────────────────────────────────────┐
//!     ───────────────────────────┼─▶ http (axum) ──▶ SessionRegistry ──▶ Widget │
//!                                │                                      │       │
//!                                │        ┌─────────────┬───────────────┤       │
//!                                │        ▼             ▼               ▼       │
//!                                │   suggest        resolve          overlay    │
//!                                │  (debounce)    (both sides)    (one route)   │
//!                                │        │             │                       │
//!                                │        └──────┬──────┘           share       │
//!                                │               ▼                (links)       │
//!                                │           geocoding ─────────────────────────┼──▶ Nominatim
//!                                └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use route_widget::config::{load_config, WidgetConfig};
use route_widget::lifecycle::{prepare, signals, Shutdown};
use route_widget::observability::init_logging;
use route_widget::WidgetServer;

#[derive(Parser)]
#[command(name = "route-widget")]
#[command(about = "Route planning widget service", long_about = None)]
struct Args {
    /// TOML configuration file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => WidgetConfig::default(),
    };

    init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "route-widget starting");
    tracing::info!(
        bind_address = %config.server.bind_address,
        geocoder = %config.geocoder.base_url,
        share_base_url = %config.share.base_url,
        debounce_ms = config.suggestions.debounce_ms,
        "Configuration loaded"
    );

    let prepared = prepare(config).await?;
    tracing::info!(address = %prepared.listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    prepared.registry.clone().spawn_idle_sweeper(shutdown.subscribe());

    let server = WidgetServer::new(prepared.registry);
    server.run(prepared.listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
