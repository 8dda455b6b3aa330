//! User configuration for tsukumo.
//!
//! Configuration lives in an INI file at `~/.tsukumo/config.ini`:
//!
//! ```ini
//! [repository]
//! url = https://packages.example.com
//! timeout = 300
//!
//! [store]
//! root = ~/packages
//!
//! [server]
//! bind = 0.0.0.0:5000
//!
//! [logging]
//! directory = ~/.tsukumo/logs
//! ```
//!
//! Missing keys fall back to defaults. Individual keys can be read and
//! written by name through [`ConfigKey`].

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    default_log_directory, DEFAULT_REPOSITORY_TIMEOUT_SECS, DEFAULT_SERVER_BIND, DEFAULT_STORE_ROOT,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{ConfigFile, LoggingSettings, RepositorySettings, ServerSettings, StoreSettings};
