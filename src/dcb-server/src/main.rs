// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

mod config;
mod listener;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use dcb_app::init_logging;
use dcb_core::{Dcb, DynResult};

use config::ServerConfig;

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - device control board simulator");
const SHUTDOWN_GRACE: Duration = Duration::from_millis(400);

#[derive(Debug, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION,
)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
    /// Board identity string
    #[arg(long = "identity")]
    identity: Option<String>,
    /// Station id the board reports
    #[arg(long = "station-id")]
    station_id: Option<String>,
    /// IP address for the TCP listener
    #[arg(short = 'l', long = "listen")]
    listen: Option<IpAddr>,
    /// Port for the TCP listener
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,
}

/// Fold CLI overrides into the loaded configuration.
fn apply_cli_overrides(cli: &Cli, cfg: &mut ServerConfig) {
    if let Some(ref identity) = cli.identity {
        cfg.board.identity = identity.clone();
    }
    if let Some(ref station_id) = cli.station_id {
        cfg.board.station_id = station_id.clone();
    }
    if let Some(listen) = cli.listen {
        cfg.listen.listen = listen;
    }
    if let Some(port) = cli.port {
        cfg.listen.port = port;
    }
}

#[tokio::main]
async fn main() -> DynResult<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", ServerConfig::example_combined_toml());
        return Ok(());
    }

    let (mut cfg, config_path) = if let Some(ref path) = cli.config {
        let cfg = ServerConfig::load_from_file(path)?;
        (cfg, Some(path.clone()))
    } else {
        ServerConfig::load_from_default_paths()?
    };
    apply_cli_overrides(&cli, &mut cfg);
    cfg.validate()
        .map_err(|e| format!("Invalid server configuration: {}", e))?;

    init_logging(cfg.general.log_level.as_deref());

    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }
    info!(
        "Starting dcb-server (identity: {}, station: {})",
        cfg.board.identity, cfg.board.station_id
    );

    let dcb = Arc::new(Dcb::from_config(&cfg.board));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut task_handles: Vec<JoinHandle<()>> = Vec::new();

    if cfg.listen.enabled {
        let listen_addr = SocketAddr::from((cfg.listen.listen, cfg.listen.port));
        let listener_dcb = Arc::clone(&dcb);
        let listener_shutdown_rx = shutdown_rx.clone();
        task_handles.push(tokio::spawn(async move {
            if let Err(e) =
                listener::run_listener(listen_addr, listener_dcb, listener_shutdown_rx).await
            {
                error!("Listener error: {:?}", e);
            }
        }));
    } else {
        warn!("[listen] disabled; board is not reachable");
    }

    signal::ctrl_c().await?;
    info!("Ctrl+C received, shutting down");
    let _ = shutdown_tx.send(true);
    tokio::time::sleep(SHUTDOWN_GRACE).await;

    for handle in &task_handles {
        if !handle.is_finished() {
            handle.abort();
        }
    }
    for handle in task_handles {
        let _ = handle.await;
    }
    Ok(())
}
