//! Default values for all configuration settings.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;

/// Default HTTP timeout for repository requests (5 minutes).
pub const DEFAULT_REPOSITORY_TIMEOUT_SECS: u64 = 300;

/// Default store root, relative to the working directory.
pub const DEFAULT_STORE_ROOT: &str = "repository";

/// Default listen address of the repository service.
pub const DEFAULT_SERVER_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 5000));

/// Default log directory (~/.tsukumo/logs).
pub fn default_log_directory() -> PathBuf {
    config_directory().join("logs")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            repository: RepositorySettings {
                url: None,
                timeout: DEFAULT_REPOSITORY_TIMEOUT_SECS,
            },
            store: StoreSettings {
                root: PathBuf::from(DEFAULT_STORE_ROOT),
            },
            server: ServerSettings {
                bind: DEFAULT_SERVER_BIND,
            },
            logging: LoggingSettings {
                directory: default_log_directory(),
            },
        }
    }
}
