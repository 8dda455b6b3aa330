//! Core traits for the packages command handler pattern.
//!
//! This module defines the interfaces that handlers depend on, enabling
//! dependency injection and testability.

use std::path::{Path, PathBuf};

use tsukumo::manager::{InstallProgressCallback, InstallReport, ManagerConfig, PackageOutcome};

use crate::error::CliError;

/// Progress callback handed to the installer by the service.
pub type ProgressCallback = InstallProgressCallback;

// ============================================================================
// Output Trait - Abstracts console output
// ============================================================================

/// Trait for outputting messages to the user.
///
/// This abstraction allows handlers to produce output without depending on
/// `println!` directly, making them testable.
pub trait Output: Send + Sync {
    /// Print a line of text.
    fn println(&self, message: &str);

    /// Print an empty line.
    fn newline(&self) {
        self.println("");
    }

    /// Print a section header.
    fn header(&self, title: &str) {
        self.println(title);
        self.println(&"=".repeat(title.len()));
    }

    /// Print an indented line.
    fn indented(&self, message: &str) {
        self.println(&format!("  {}", message));
    }

    /// Print a warning message.
    fn warning(&self, message: &str) {
        self.println(&format!("Warning: {}", message));
    }

    /// Print a success message.
    fn success(&self, message: &str) {
        self.println(&format!("Success: {}", message));
    }

    /// Create a callback that reports install stages as they happen.
    fn create_progress_callback(&self) -> ProgressCallback;
}

// ============================================================================
// Install Summary - Handler-facing view of an install report
// ============================================================================

/// Status of one package visited by an install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageStatus {
    /// Fetched and written.
    Installed { archive: String, entries: usize },
    /// Present in the store before the install.
    AlreadyInstalled,
    /// Handled earlier in the same install.
    AlreadyVisited,
    /// Could not be installed.
    Failed(String),
}

/// One line of an install summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLine {
    pub name: String,
    pub requested_by: Option<String>,
    pub version_label: Option<String>,
    pub status: PackageStatus,
}

/// Outcome of an install, detached from the library's error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSummary {
    pub requested: String,
    pub destination: PathBuf,
    pub packages: Vec<PackageLine>,
}

impl InstallSummary {
    /// Failure reason of the requested package, if it failed.
    pub fn requested_failure(&self) -> Option<&str> {
        self.packages
            .iter()
            .find(|line| line.name == self.requested && line.requested_by.is_none())
            .and_then(|line| match &line.status {
                PackageStatus::Failed(reason) => Some(reason.as_str()),
                _ => None,
            })
    }

    /// Names of dependencies that failed.
    pub fn failed_dependencies(&self) -> Vec<String> {
        self.packages
            .iter()
            .filter(|line| line.requested_by.is_some())
            .filter(|line| matches!(line.status, PackageStatus::Failed(_)))
            .map(|line| line.name.clone())
            .collect()
    }
}

impl From<&InstallReport> for InstallSummary {
    fn from(report: &InstallReport) -> Self {
        let packages = report
            .records()
            .iter()
            .map(|record| PackageLine {
                name: record.name.clone(),
                requested_by: record.requested_by.clone(),
                version_label: record.version_label.clone(),
                status: match &record.outcome {
                    PackageOutcome::Installed { archive, entries } => PackageStatus::Installed {
                        archive: archive.clone(),
                        entries: *entries,
                    },
                    PackageOutcome::AlreadyInstalled => PackageStatus::AlreadyInstalled,
                    PackageOutcome::AlreadyVisited => PackageStatus::AlreadyVisited,
                    PackageOutcome::Failed(e) => PackageStatus::Failed(e.to_string()),
                },
            })
            .collect();

        Self {
            requested: report.requested().to_string(),
            destination: report.destination().to_path_buf(),
            packages,
        }
    }
}

/// Result of packing files into an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackResult {
    pub output: PathBuf,
    pub entries: usize,
    pub checksum: String,
}

// ============================================================================
// Package Service Trait
// ============================================================================

/// Trait for package manager operations.
///
/// Abstracts the installer and store to allow mocking in tests.
pub trait PackageService: Send + Sync {
    /// Install a package and its dependencies.
    ///
    /// With `destination`, the install targets that directory instead of the
    /// configured store root.
    fn install(
        &self,
        config: &ManagerConfig,
        name: &str,
        destination: Option<&Path>,
        on_progress: Option<ProgressCallback>,
    ) -> Result<InstallSummary, CliError>;

    /// List the names in a store.
    fn list(&self, store_root: &Path) -> Result<Vec<String>, CliError>;

    /// Pack local files into an archive whose format follows the output extension.
    fn pack(&self, output: &Path, files: &[PathBuf]) -> Result<PackResult, CliError>;
}

// ============================================================================
// Command Context - Dependency container for handlers
// ============================================================================

/// Context containing all dependencies needed by command handlers.
pub struct CommandContext<'a> {
    /// Output for user messages
    pub output: &'a dyn Output,
    /// Package service
    pub packages: &'a dyn PackageService,
}

impl<'a> CommandContext<'a> {
    /// Create a new command context.
    pub fn new(output: &'a dyn Output, packages: &'a dyn PackageService) -> Self {
        Self { output, packages }
    }
}

// ============================================================================
// Command Handler Trait
// ============================================================================

/// Trait for command handlers.
///
/// Each command implements this trait with its specific argument type.
pub trait CommandHandler {
    /// The argument type for this command.
    type Args;

    /// Execute the command with the given arguments and context.
    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError>;
}
