//! Tsukumo CLI - Command-line interface
//!
//! This binary provides a command-line interface to the tsukumo library:
//! installing packages from a repository, listing and packing them locally,
//! and serving a store over HTTP.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use tsukumo::config::ConfigFile;
use tsukumo::logging::{init_logging, LoggingGuard, DEFAULT_LOG_FILE};

use commands::config::ConfigCommands;
use commands::packages::PackagesCommands;
use commands::serve::ServeArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "tsukumo")]
#[command(version, about = "A minimal package manager for tar archives", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Packages(PackagesCommands),

    /// Serve a package store over HTTP
    Serve(ServeArgs),

    /// View and modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        e.exit();
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Config { command } => commands::config::run(command),
        Commands::Packages(command) => {
            let (config, _guard) = load_config()?;
            commands::packages::run(command, &config)
        }
        Commands::Serve(args) => {
            let (config, _guard) = load_config()?;
            commands::serve::run(args, &config)
        }
    }
}

/// Load the config file and start logging into its log directory.
fn load_config() -> Result<(ConfigFile, LoggingGuard), CliError> {
    let config = ConfigFile::load()?;
    let guard = init_logging(&config.logging.directory, DEFAULT_LOG_FILE)
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;
    tracing::debug!(log = %guard.log_path().display(), "Logging initialized");
    Ok((config, guard))
}
