//! Pi Gateway: a single-host HTTP reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────────┐
//!                          │                    GATEWAY                       │
//!                          │                                                  │
//!     Client Request       │  ┌─────────┐    ┌────────────┐                   │
//!     ─────────────────────┼─▶│  http   │───▶│ dispatcher │                   │
//!                          │  │ server  │    └─────┬──────┘                   │
//!                          │  └─────────┘          │                          │
//!                          │        ┌──────────────┼──────────────┐           │
//!                          │        ▼              ▼              ▼           │
//!                          │  ┌───────────┐  ┌───────────┐  ┌───────────┐     │
//!                          │  │  admin    │  │  routing  │  │    404    │     │
//!                          │  │ API + UI  │  │  matcher  │  └───────────┘     │
//!                          │  └─────┬─────┘  └─────┬─────┘                    │
//!                          │        │ mutate       │ snapshot                 │
//!                          │        ▼              ▼                          │
//!                          │  ┌──────────────────────────┐   ┌────────────┐   │
//!                          │  │       route table        │──▶│   store    │   │
//!                          │  │ (ArcSwap + writer mutex) │   │routes.json │   │
//!                          │  └──────────────────────────┘   └────────────┘   │
//!                          │                  │                               │
//!     Client Response      │  ┌─────────┐     ▼                               │
//!     ◀────────────────────┼──│  proxy  │◀── forward ────────────────────────┼──── Backend
//!                          │  └─────────┘                                     │
//!                          └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use pi_gateway::config::{load_config, validate_config, ConfigError, GatewayConfig};
use pi_gateway::http::{GatewayServer, ADMIN_PREFIX, ROUTES_ENDPOINT};
use pi_gateway::lifecycle::{wait_for_signal, Shutdown};
use pi_gateway::observability::{logging, metrics};
use pi_gateway::routing::RouteTable;
use pi_gateway::store::RouteStore;

#[derive(Parser, Debug)]
#[command(
    name = "pi-gateway",
    version,
    about = "HTTP reverse proxy gateway with a managed route table"
)]
struct Args {
    /// Optional TOML settings file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listening port (replaces the port of listener.bind_address).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Admin username for the management API.
    #[arg(long)]
    user: Option<String>,

    /// Admin password for the management API.
    #[arg(long)]
    password: Option<String>,

    /// Route file (JSON).
    #[arg(long)]
    routes: Option<PathBuf>,

    /// Directory of the built management UI.
    #[arg(long)]
    ui_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn into_config(self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GatewayConfig::default(),
        };

        if let Some(port) = self.port {
            config.listener.set_port(port);
        }
        if let Some(user) = self.user {
            config.admin.username = user;
        }
        if let Some(password) = self.password {
            config.admin.password = password;
        }
        if let Some(routes) = self.routes {
            config.routes.file = routes;
        }
        if let Some(dir) = self.ui_dir {
            config.ui.dir = dir;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse().into_config()?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("pi-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(user = %config.admin.username, "Admin credentials configured");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let store = RouteStore::new(config.routes.file.clone());
    let table = Arc::new(RouteTable::load(store, config.routes.match_strategy).await);
    metrics::record_route_count(table.len());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        address = %local_addr,
        management = %format!("http://{}{}", local_addr, ADMIN_PREFIX),
        routes_api = %format!("http://{}{}", local_addr, ROUTES_ENDPOINT),
        "Gateway listening"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    let server = GatewayServer::new(config, table)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
