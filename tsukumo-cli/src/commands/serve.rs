//! `serve` command: run the HTTP repository service.
//!
//! The tokio runtime is built here rather than in `main`, so the blocking
//! HTTP client used by `install` never runs inside an async context.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use console::style;
use tracing::info;
use tsukumo::config::ConfigFile;
use tsukumo::manager::LocalStore;

use crate::error::CliError;

/// Arguments for the serve command.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address (default: from config, 0.0.0.0:5000)
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Store directory (default: from config)
    #[arg(long)]
    pub store_dir: Option<PathBuf>,
}

/// Serve the store until the process is interrupted.
pub fn run(args: ServeArgs, config: &ConfigFile) -> Result<(), CliError> {
    let bind = args.bind.unwrap_or(config.server.bind);
    let root = args.store_dir.unwrap_or_else(|| config.store.root.clone());
    let store = Arc::new(LocalStore::open(&root)?);

    println!(
        "{} {} on http://{}",
        style("Serving").green().bold(),
        root.display(),
        bind
    );
    info!(root = %root.display(), %bind, "Starting repository service");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Serve)?;

    runtime
        .block_on(tsukumo::server::run(bind, store))
        .map_err(CliError::Serve)
}
