//! certvault REST server
//!
//! Serves certificate CRUD and ownership transfers over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use certvault_core::config::load_config;
use certvault_core::tracing_init::{default_filter, init_tracing};
use certvault_core::Ledger;
use certvault_server::routes::{build_router, cors_layer, AppState};
use certvault_server::shutdown::shutdown_on;

#[derive(Parser, Debug)]
#[command(name = "certvault-server")]
#[command(version, about = "certvault REST server - certificates and ownership transfers")]
struct Args {
    /// Path to a JSON settings file.
    #[arg(long, env = "CERTVAULT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (overrides the settings file).
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Start without the built-in certificates.
    #[arg(long)]
    no_seed: bool,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(addr) = args.addr {
        config.server.listen_addr = addr;
    }
    if args.no_seed {
        config.data.seed = false;
    }

    init_tracing(&default_filter(&config.server.log_level), args.log_json);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.server.listen_addr,
        seed = config.data.seed,
        "Starting certvault-server"
    );

    let ledger = if config.data.seed {
        Ledger::seeded()?
    } else {
        Ledger::empty()?
    };

    let app = build_router(AppState { ledger })
        .layer(cors_layer(&config.server.cors_allowed_origins));

    let listener = tokio::net::TcpListener::bind(config.server.listen_addr).await?;
    info!(addr = %config.server.listen_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await?;

    info!("certvault-server stopped");
    Ok(())
}
