//! `config` command: inspect and edit `~/.tsukumo/config.ini`.
//!
//! Keys are addressed as `section.key`, matching the INI layout.

use clap::Subcommand;
use console::style;
use tsukumo::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Placeholder shown for keys without a value.
const UNSET: &str = "(not set)";

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of one key
    Get {
        /// Dotted key, e.g. repository.url
        key: String,
    },

    /// Change the value of one key and save the file
    Set {
        /// Dotted key, e.g. repository.url
        key: String,

        /// New value
        value: String,
    },

    /// Print every key with its current value
    List,

    /// Print where the configuration file lives
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => {
            let key = lookup(&key)?;
            println!("{}", display_value(&key.get(&ConfigFile::load()?)));
        }
        ConfigCommands::Set { key, value } => {
            let key = lookup(&key)?;
            let mut config = ConfigFile::load()?;
            key.set(&mut config, &value)
                .map_err(|e| CliError::Config(e.to_string()))?;
            config.save()?;
            println!("{} {} = {}", style("Updated").green().bold(), key.name(), value);
        }
        ConfigCommands::List => {
            let config = ConfigFile::load()?;
            println!("{}", style(config_file_path().display()).dim());
            for line in listing(&config) {
                println!("{}", line);
            }
        }
        ConfigCommands::Path => println!("{}", config_file_path().display()),
    }
    Ok(())
}

fn lookup(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        let known: Vec<&str> = ConfigKey::all().iter().map(ConfigKey::name).collect();
        CliError::Config(format!(
            "unknown key '{}' (expected one of: {})",
            key,
            known.join(", ")
        ))
    })
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        UNSET
    } else {
        value
    }
}

/// One line per key, dotted names padded to a common width.
fn listing(config: &ConfigFile) -> Vec<String> {
    let keys = ConfigKey::all();
    let width = keys.iter().map(|k| k.name().len()).max().unwrap_or(0);

    keys.iter()
        .map(|key| {
            format!(
                "{:<width$}  {}",
                key.name(),
                display_value(&key.get(config)),
                width = width
            )
        })
        .collect()
}
