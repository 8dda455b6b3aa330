//! Configuration key access and validation.
//!
//! Provides a type-safe interface for getting and setting configuration
//! values by their dotted key name (e.g. `repository.url`).

use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use super::parser::expand_tilde;
use super::settings::ConfigFile;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    RepositoryUrl,
    RepositoryTimeout,
    StoreRoot,
    ServerBind,
    LoggingDirectory,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|key| key.name() == s.to_lowercase())
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Get the canonical key name (e.g., "repository.url").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::RepositoryUrl => "repository.url",
            ConfigKey::RepositoryTimeout => "repository.timeout",
            ConfigKey::StoreRoot => "store.root",
            ConfigKey::ServerBind => "server.bind",
            ConfigKey::LoggingDirectory => "logging.directory",
        }
    }

    /// Get the section name (e.g., "repository").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "url").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::RepositoryUrl => config.repository.url.clone().unwrap_or_default(),
            ConfigKey::RepositoryTimeout => config.repository.timeout.to_string(),
            ConfigKey::StoreRoot => path_to_display(&config.store.root),
            ConfigKey::ServerBind => config.server.bind.to_string(),
            ConfigKey::LoggingDirectory => path_to_display(&config.logging.directory),
        }
    }

    /// Validate and set the value in a config file.
    ///
    /// An empty value clears `repository.url`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        let value = value.trim();
        let fail = |reason: &str| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: reason.to_string(),
        };

        match self {
            ConfigKey::RepositoryUrl => {
                if value.is_empty() {
                    config.repository.url = None;
                } else if value.starts_with("http://") || value.starts_with("https://") {
                    config.repository.url = Some(value.to_string());
                } else {
                    return Err(fail("must be a URL starting with 'http://' or 'https://'"));
                }
            }
            ConfigKey::RepositoryTimeout => {
                config.repository.timeout = match value.parse::<u64>() {
                    Ok(secs) if secs > 0 => secs,
                    _ => return Err(fail("must be a positive integer")),
                };
            }
            ConfigKey::StoreRoot => {
                if value.is_empty() {
                    return Err(fail("must be a valid path"));
                }
                config.store.root = expand_tilde(value);
            }
            ConfigKey::ServerBind => {
                config.server.bind = value
                    .parse::<SocketAddr>()
                    .map_err(|_| fail("must be an address like '0.0.0.0:5000'"))?;
            }
            ConfigKey::LoggingDirectory => {
                if value.is_empty() {
                    return Err(fail("must be a valid path"));
                }
                config.logging.directory = expand_tilde(value);
            }
        }

        Ok(())
    }

    /// Get all supported configuration keys.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::RepositoryUrl,
            ConfigKey::RepositoryTimeout,
            ConfigKey::StoreRoot,
            ConfigKey::ServerBind,
            ConfigKey::LoggingDirectory,
        ]
    }
}

/// Convert path to display string, collapsing home dir to ~.
fn path_to_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_config_key_parsing() {
        assert_eq!(
            "repository.url".parse::<ConfigKey>().unwrap(),
            ConfigKey::RepositoryUrl
        );
        assert_eq!(
            "SERVER.BIND".parse::<ConfigKey>().unwrap(),
            ConfigKey::ServerBind
        );
        assert!(matches!(
            "repository.mirror".parse::<ConfigKey>(),
            Err(ConfigKeyError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_key_name_parts() {
        assert_eq!(ConfigKey::StoreRoot.section(), "store");
        assert_eq!(ConfigKey::StoreRoot.key_name(), "root");
        assert_eq!(ConfigKey::RepositoryTimeout.section(), "repository");
        assert_eq!(ConfigKey::RepositoryTimeout.key_name(), "timeout");
    }

    #[test]
    fn test_get_and_set() {
        let mut config = ConfigFile::default();
        assert_eq!(ConfigKey::RepositoryUrl.get(&config), "");

        ConfigKey::RepositoryUrl
            .set(&mut config, "https://repo.example")
            .unwrap();
        ConfigKey::RepositoryTimeout.set(&mut config, "60").unwrap();
        ConfigKey::StoreRoot.set(&mut config, "/srv/store").unwrap();
        ConfigKey::ServerBind.set(&mut config, "127.0.0.1:8080").unwrap();

        assert_eq!(
            config.repository.url.as_deref(),
            Some("https://repo.example")
        );
        assert_eq!(ConfigKey::RepositoryTimeout.get(&config), "60");
        assert_eq!(config.store.root, PathBuf::from("/srv/store"));
        assert_eq!(ConfigKey::ServerBind.get(&config), "127.0.0.1:8080");
    }

    #[test]
    fn test_clear_url() {
        let mut config = ConfigFile::default();
        config.repository.url = Some("http://x".to_string());
        ConfigKey::RepositoryUrl.set(&mut config, "").unwrap();
        assert!(config.repository.url.is_none());
    }

    #[test]
    fn test_set_invalid_value_fails() {
        let mut config = ConfigFile::default();
        let cases = [
            (ConfigKey::RepositoryUrl, "ftp://repo"),
            (ConfigKey::RepositoryTimeout, "0"),
            (ConfigKey::RepositoryTimeout, "abc"),
            (ConfigKey::StoreRoot, "  "),
            (ConfigKey::ServerBind, "nowhere"),
        ];

        for (key, value) in cases {
            assert!(
                matches!(
                    key.set(&mut config, value),
                    Err(ConfigKeyError::ValidationFailed { .. })
                ),
                "{} = {} should fail",
                key.name(),
                value
            );
        }
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_all_keys_roundtrip_names() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
        assert_eq!(ConfigKey::all().len(), 5);
    }
}
