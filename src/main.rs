//! Agent chat gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                  GATEWAY                     │
//!     Client Request     │  ┌────────┐   ┌─────────┐   ┌────────────┐   │
//!     ───────────────────┼─▶│  http  │──▶│ routing │──▶│ passthrough│───┼──▶ Agent backend
//!                        │  │ server │   │  mount  │   └────────────┘   │
//!                        │  └────────┘   └────┬────┘   ┌────────────┐   │
//!                        │                    ├───────▶│    auth    │───┼──▶ Login service
//!                        │                    │        └─────┬──────┘   │
//!                        │                    │              ▼          │
//!                        │                    │        ┌────────────┐   │
//!                        │                    └───────▶│  session   │   │
//!                        │                             │  cookies   │   │
//!                        │                             └────────────┘   │
//!                        │ config · observability · lifecycle · security│
//!                        └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use agent_chat_gateway::config::validation::validate_config;
use agent_chat_gateway::config::watcher::ConfigWatcher;
use agent_chat_gateway::config::{self, ConfigError, ProxyConfig};
use agent_chat_gateway::lifecycle::{startup, Shutdown};
use agent_chat_gateway::net::tls::load_tls_config;
use agent_chat_gateway::observability::{logging, metrics};
use agent_chat_gateway::HttpServer;

/// Same-origin gateway for the agent chat web app.
#[derive(Parser, Debug)]
#[command(name = "agent-chat-gateway", version, about)]
struct Args {
    /// TOML configuration file; watched for changes when given.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match load(args.config.as_deref(), args.bind) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    logging::init(&config.observability);

    if args.check {
        tracing::info!("Configuration is valid");
        return Ok(());
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        bind_address = %config.listener.bind_address,
        "agent-chat-gateway starting"
    );
    startup::report_upstreams(&config);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher handle must outlive the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            match watcher.run() {
                Ok(handle) => (Some(handle), updates),
                Err(e) => {
                    tracing::warn!(error = %e, "Config hot reload disabled");
                    (None, updates)
                }
            }
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    let tls = config.listener.tls.clone();
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    match tls {
        Some(tls) => {
            let addr: SocketAddr = bind_address.parse()?;
            let rustls = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;
            server
                .run_tls(addr, rustls, config_updates, server_shutdown)
                .await?;
        }
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            server.run(listener, config_updates, server_shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolve the startup configuration: file or environment, then `--bind`.
fn load(path: Option<&Path>, bind: Option<String>) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => config::load_config(path)?,
        None => config::from_env()?,
    };

    if let Some(bind) = bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    Ok(config)
}
