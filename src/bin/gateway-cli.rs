use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::json;

use workspace_gateway::config::DomainConfig;
use workspace_gateway::controller::{DomainEnvironment, SubdomainController};
use workspace_gateway::workspace::{
    extract_subdomain, validate_subdomain, HttpWorkspaceResolver, ResolveOutcome, WorkspaceResolver,
};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Inspect workspace resolution for a host", long_about = None)]
struct Cli {
    /// Development root (host:port).
    #[arg(long, default_value = "localhost:8080")]
    dev_root: String,

    /// Production root domain.
    #[arg(long, default_value = "uproom.com")]
    production_root: String,

    /// Hosted preview suffix.
    #[arg(long, default_value = "lovable.app")]
    preview_suffix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the workspace label a host addresses
    Extract { host: String },
    /// Check an identifier against the subdomain rules
    Validate { identifier: String },
    /// Look up one identifier, skipping extraction and validation
    Resolve {
        identifier: String,
        #[arg(long, default_value = "http://localhost:3001/api")]
        api: String,
        #[arg(long)]
        token: Option<String>,
    },
    /// Run full detection (extract, validate, look up) for a host
    Detect {
        host: String,
        #[arg(long, default_value = "http://localhost:3001/api")]
        api: String,
        /// Bearer token for the lookup
        #[arg(long)]
        token: Option<String>,
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
    /// Print the URL of a workspace as seen from a host
    WorkspaceUrl {
        identifier: String,
        #[arg(long, default_value = "localhost:8080")]
        host: String,
    },
    /// Print the main-site URL as seen from a host
    MainUrl {
        #[arg(long, default_value = "localhost:8080")]
        host: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let environment = DomainEnvironment::from(&DomainConfig {
        dev_root: cli.dev_root,
        preview_suffix: cli.preview_suffix,
        production_root: cli.production_root,
    });

    let output = match cli.command {
        Commands::Extract { host } => json!({ "subdomain": extract_subdomain(&host) }),
        Commands::Validate { identifier } => serde_json::to_value(validate_subdomain(&identifier))?,
        Commands::Resolve { identifier, api, token } => {
            let resolver =
                HttpWorkspaceResolver::new(api, Duration::from_secs(30))?.with_bearer_token(token);
            serde_json::to_value(ResolveOutcome::from(resolver.resolve(&identifier).await))?
        }
        Commands::Detect {
            host,
            api,
            token,
            timeout_secs,
        } => {
            let resolver = HttpWorkspaceResolver::new(api, Duration::from_secs(timeout_secs))?
                .with_bearer_token(token);
            let controller = SubdomainController::new(host, Arc::new(resolver), environment);
            serde_json::to_value(controller.detect().await)?
        }
        Commands::WorkspaceUrl { identifier, host } => {
            json!({ "url": environment.workspace_url(&identifier, &host) })
        }
        Commands::MainUrl { host } => json!({ "url": environment.main_domain_url(&host) }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
