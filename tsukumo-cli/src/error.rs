//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use tsukumo::config::ConfigFileError;
use tsukumo::manager::ManagerError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Configuration file could not be read or written
    ConfigFile(ConfigFileError),
    /// Package manager operation failed
    Manager(ManagerError),
    /// The requested package could not be installed
    Install { package: String, reason: String },
    /// The requested package was installed but some dependencies failed
    IncompleteInstall { package: String, failed: Vec<String> },
    /// Failed to read an input file
    FileRead { path: PathBuf, error: std::io::Error },
    /// Failed to write an output file
    FileWrite { path: PathBuf, error: std::io::Error },
    /// HTTP service error
    Serve(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Manager(ManagerError::MissingRepoConfig) => {
                eprintln!();
                eprintln!("Set a repository with one of:");
                eprintln!("  tsukumo config set repository.url http://host:5000/packages");
                eprintln!("  tsukumo install <name> --repo-url http://host:5000/packages");
            }
            CliError::Serve(_) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. Address in use: pick another with --bind");
                eprintln!("  2. Ports below 1024 need elevated privileges");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration error: {}", e),
            CliError::Manager(e) => write!(f, "{}", e),
            CliError::Install { package, reason } => {
                write!(f, "Failed to install {}: {}", package, reason)
            }
            CliError::IncompleteInstall { package, failed } => write!(
                f,
                "Installed {} but {} dependenc{} failed: {}",
                package,
                failed.len(),
                if failed.len() == 1 { "y" } else { "ies" },
                failed.join(", ")
            ),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read file '{}': {}", path.display(), error)
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
            CliError::Serve(e) => write!(f, "HTTP server error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Manager(e) => Some(e),
            CliError::FileRead { error, .. } => Some(error),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::Serve(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ManagerError> for CliError {
    fn from(e: ManagerError) -> Self {
        CliError::Manager(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}
