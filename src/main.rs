//! Scope proxy
//!
//! ```text
//!     Browser request
//!     ──────────────▶ http::server ──▶ dispatch (exclusions)
//!                                          │
//!                          ┌───────────────┴──────────────┐
//!                          ▼                              ▼
//!                   engine (claimed)                direct transport
//!                          │
//!                          ▼
//!                 request hooks: intercept
//!                  ├─ blocklist   → 403 Site Blocked
//!                  ├─ playground  → synthetic / empty body
//!                  └─ otherwise   → transport → HTML length fix-up
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use scope_proxy::config::{load_config, validate_config, ConfigError, ProxyConfig};
use scope_proxy::observability::{logging, metrics};
use scope_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "scope-proxy")]
#[command(about = "Scoped web proxy with request blocking and playground content", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability);
    tracing::info!("scope-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        scope = %config.scope.url,
        patterns = config.blocklist.patterns.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
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
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    shutdown.trigger_on_ctrl_c().await?;
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
