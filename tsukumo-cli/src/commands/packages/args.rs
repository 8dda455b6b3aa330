//! Argument types and CLI definitions for package commands.
//!
//! This module contains the clap-derived subcommands and the resolved
//! argument structs handed to handlers.

use std::path::PathBuf;

use clap::Subcommand;
use tsukumo::manager::ManagerConfig;

/// Package subcommands.
#[derive(Debug, Subcommand)]
pub enum PackagesCommands {
    /// Install a package and its dependencies from the repository
    Install {
        /// Package name (e.g. "core")
        name: String,

        /// Install into this directory instead of the store root
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Repository base URL (default: from config)
        #[arg(long)]
        repo_url: Option<String>,

        /// Store directory (default: from config)
        #[arg(long)]
        store_dir: Option<PathBuf>,
    },

    /// List installed packages
    List {
        /// Store directory (default: from config)
        #[arg(long)]
        store_dir: Option<PathBuf>,
    },

    /// Pack local files into a .tar.gz or .tar archive
    Pack {
        /// Output archive path; the extension selects the format
        output: PathBuf,

        /// Files to include
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Arguments for the install command.
#[derive(Debug, Clone)]
pub struct InstallArgs {
    pub name: String,
    pub destination: Option<PathBuf>,
    pub manager: ManagerConfig,
}

/// Arguments for the list command.
#[derive(Debug, Clone)]
pub struct ListArgs {
    pub store_root: PathBuf,
}

/// Arguments for the pack command.
#[derive(Debug, Clone)]
pub struct PackArgs {
    pub output: PathBuf,
    pub files: Vec<PathBuf>,
}
