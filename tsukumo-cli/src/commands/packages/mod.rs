//! Package command handlers.
//!
//! Implements `install`, `list`, and `pack`. Handlers depend on the
//! [`Output`] and [`PackageService`] traits so they can be tested without a
//! repository or a terminal.

mod args;
mod handlers;
mod services;
mod traits;

#[cfg(test)]
mod tests;

use tsukumo::config::ConfigFile;
use tsukumo::manager::ManagerConfig;

pub use args::PackagesCommands;

use args::{InstallArgs, ListArgs, PackArgs};
use handlers::{InstallHandler, ListHandler, PackHandler};
use services::{ConsoleOutput, DefaultPackageService};
use traits::{CommandContext, CommandHandler};

use crate::error::CliError;

/// Run a package subcommand with settings from the loaded config file.
pub fn run(command: PackagesCommands, config: &ConfigFile) -> Result<(), CliError> {
    let output = ConsoleOutput::new();
    let service = DefaultPackageService::new();
    let ctx = CommandContext::new(&output, &service);

    match command {
        PackagesCommands::Install {
            name,
            dest,
            repo_url,
            store_dir,
        } => {
            let mut manager = ManagerConfig::from(config);
            if let Some(url) = repo_url {
                manager = manager.with_repo_url(url);
            }
            if let Some(dir) = store_dir {
                manager = manager.with_store_root(dir);
            }

            InstallHandler::execute(
                InstallArgs {
                    name,
                    destination: dest,
                    manager,
                },
                &ctx,
            )
        }

        PackagesCommands::List { store_dir } => ListHandler::execute(
            ListArgs {
                store_root: store_dir.unwrap_or_else(|| config.store.root.clone()),
            },
            &ctx,
        ),

        PackagesCommands::Pack { output, files } => {
            PackHandler::execute(PackArgs { output, files }, &ctx)
        }
    }
}
