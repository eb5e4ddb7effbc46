use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use workspace_gateway::config::{load_config, GatewayConfig};
use workspace_gateway::lifecycle::{wait_for_signal, Shutdown};
use workspace_gateway::observability::{logging, metrics};
use workspace_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "workspace-gateway")]
#[command(about = "Subdomain-addressed workspace gateway", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "workspace-gateway starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_base_url = %config.api.base_url,
        dev_root = %config.domains.dev_root,
        production_root = %config.domains.production_root,
        rate_limit = config.rate_limit.enabled,
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    let signals = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signals.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
