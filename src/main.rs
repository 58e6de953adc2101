//! Twirp transport server (v1)
//!
//! Serves the Haberdasher example service.
//!
//! # Architecture Overview
//!
//! ```text
//!     POST /twirp/<service>/<method>
//!     ─────────────────────────────▶ http::server (verb, Content-Type checks)
//!                                         │
//!                                         ▼
//!                                    routing::SharedRoutes (exact match)
//!                                         │
//!                                         ▼
//!                                    handler (decode → call → encode)
//!                                         │
//!     200 + body | error JSON             ▼
//!     ◀───────────────────────────── http::response
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use twirp_transport::config::{load_config, TwirpConfig};
use twirp_transport::haberdasher::{self, FancyHats};
use twirp_transport::lifecycle::signals;
use twirp_transport::observability::{logging, metrics};
use twirp_transport::{RouteTable, TwirpServer};

#[derive(Parser)]
#[command(name = "twirp-transport")]
#[command(about = "Twirp-style RPC server hosting the Haberdasher service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => TwirpConfig::default(),
    };

    logging::init_logging(&config.observability.log_filter);
    tracing::info!("twirp-transport v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address,
        prefix = %config.server.prefix,
        max_body_bytes = config.server.max_body_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut table = RouteTable::new(&config.server.prefix);
    haberdasher::register(&mut table, Arc::new(FancyHats))?;

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    tokio::spawn(async move {
        signals::wait_for_signal().await;
        let _ = shutdown_tx.send(());
    });

    TwirpServer::new(config.server, table)?
        .run(listener, shutdown_rx)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
