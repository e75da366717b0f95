//! Fake push notification backend.
//!
//! ```text
//!     SDK request ──▶ axum catch-all ──▶ routing (templates) ──▶ handlers
//!                                                                  │
//!                                          TokenVerifier ◀─────────┤ (PUT .../user)
//!                                                                  ▼
//!     SDK response ◀── Reply / ApiError ◀───────────────── TenantStore → DeviceTable
//! ```

use std::path::PathBuf;

use clap::Parser;

use fake_errol::config::{load_config, validate_config, ServerConfig};
use fake_errol::lifecycle::signals::shutdown_on_ctrl_c;
use fake_errol::observability::{logging, metrics};
use fake_errol::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "fake-errol")]
#[command(about = "In-memory fake of the push notification device API", long_about = None)]
struct Cli {
    /// TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file).
    #[arg(short, long)]
    port: Option<u16>,

    /// Shared secret for user tokens (overrides the config file).
    #[arg(short = 'k', long)]
    cluster_key: Option<String>,

    /// Log level (overrides the config file).
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    if let Some(key) = cli.cluster_key {
        config.auth.cluster_key = key;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            eprintln!("invalid configuration: {error}");
        }
        return Err(format!("{} configuration error(s)", errors.len()).into());
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("fake-errol v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        request_timeout_secs = config.timeouts.request_secs,
        cluster_key_set = !config.auth.cluster_key.is_empty(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = tokio::net::TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown_on_ctrl_c(shutdown));
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
