//! beanbus — remote-method invocation container.
//!
//! A single-process server that accepts one remote call per TCP connection,
//! routes it to a deployed application by class name, invokes the requested
//! bean method, and writes the outcome back on the same connection.
//!
//! Usage:
//!   beanbus --apps /opt/beanbus/apps                 # Default port 8585
//!   beanbus --apps ./apps --port 9000                # Custom port
//!   beanbus --apps ./apps --verbose                  # Debug logging

use std::path::PathBuf;
use std::sync::Arc;

use beanbus_container::{deploy_from_dir, DispatchTable, Dispatcher};
use beanbus_transport::{TransportConfig, TransportServer};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "beanbus", about = "beanbus — remote-method invocation container")]
struct Cli {
    /// Port to listen on (0 for OS-assigned)
    #[arg(long, default_value = "8585")]
    port: u16,

    /// Hostname to bind to
    #[arg(long, default_value = "127.0.0.1")]
    hostname: String,

    /// Application base directory to deploy from
    #[arg(long, default_value = "apps")]
    apps: PathBuf,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Deploying applications from {}", cli.apps.display());

    // Each deployed application gets its own dispatch table. Embedders
    // register bean factories on these tables through the library API;
    // the daemon itself deploys them empty.
    let registry = match deploy_from_dir(&cli.apps, |_name| Arc::new(DispatchTable::new())) {
        Ok(registry) => registry,
        Err(e) => {
            error!("Deployment failed: {e}");
            std::process::exit(1);
        }
    };

    if registry.is_empty() {
        info!("No applications deployed; all calls will fault on routing");
    }

    let dispatcher = Arc::new(Dispatcher::new(registry));

    let config = TransportConfig {
        port: cli.port,
        hostname: cli.hostname,
    };

    let mut server = match TransportServer::start(config, dispatcher).await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to start transport server: {e}");
            std::process::exit(1);
        }
    };

    info!("beanbus serving on port {}", server.port());

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }

    info!("Shutdown signal received");
    server.stop().await;
}
