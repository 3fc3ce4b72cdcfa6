//! exchange-audit: items API with every exchange audited.
//!
//! ```text
//!   client ──▶ trace ─▶ request id ─▶ body limit ─▶ timeout ─▶ [audit] ─▶ handler
//!                                                               │
//!                                                               ▼
//!                                                      sink (tracing, target "audit")
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use exchange_audit::config::{load_config, AuditConfig};
use exchange_audit::observability::{logging, metrics};
use exchange_audit::{AuditServer, Shutdown, TracingSink};

#[derive(Parser, Debug)]
#[command(name = "exchange-audit", version, about = "HTTP exchange audit logging")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AuditConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mode = ?config.capture.mode,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // kept alive until the server returns; dropping it would stop the server
    let shutdown = Shutdown::new();
    let server = AuditServer::new(config, Arc::new(TracingSink));
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
