//! Command-line interface for the netpulse server.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::server;
use crate::server::config::AppConfig;

/// Periodic network speed monitor with an HTTP results API
#[derive(Parser)]
#[command(name = "netpulse", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server and background monitor (the default)
    Serve {
        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,

        /// Override the SQLite database path
        #[arg(long)]
        db: Option<PathBuf>,

        /// Override the measurement interval in seconds
        #[arg(long)]
        interval: Option<u64>,

        /// Serve stored results only, without the background monitor
        #[arg(long)]
        no_monitor: bool,
    },
}

/// Dispatch the parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Serve {
        port: None,
        db: None,
        interval: None,
        no_monitor: false,
    });

    match command {
        Commands::Serve {
            port,
            db,
            interval,
            no_monitor,
        } => {
            let mut config = AppConfig::load(cli.config.as_deref())?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(db) = db {
                config.db_path = Some(db);
            }
            if let Some(interval) = interval {
                config.monitor.interval_secs = interval;
            }
            if no_monitor {
                config.monitor.enabled = false;
            }
            config.validate()?;

            server::run(config).await
        }
    }
}
