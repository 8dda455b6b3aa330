//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Remote repository settings
    pub repository: RepositorySettings,
    /// Local store settings
    pub store: StoreSettings,
    /// Repository service settings
    pub server: ServerSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Remote repository configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySettings {
    /// Base URL archives are fetched from. Installs fail without it.
    pub url: Option<String>,
    /// HTTP request timeout in seconds.
    pub timeout: u64,
}

/// Local store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Directory holding installed and uploaded packages.
    pub root: PathBuf,
}

/// Repository service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Address the HTTP service listens on.
    pub bind: SocketAddr,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Directory the session log file is written to.
    pub directory: PathBuf,
}
