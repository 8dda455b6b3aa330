//! Command handlers for package CLI commands.
//!
//! Each handler implements the `CommandHandler` trait and contains the
//! business logic for its respective command.

use tsukumo::manager::ManagerError;
use tsukumo::package::allowed_file;

use super::args::{InstallArgs, ListArgs, PackArgs};
use super::traits::{CommandContext, CommandHandler, PackageLine, PackageStatus};
use crate::error::CliError;

// ============================================================================
// Install Handler
// ============================================================================

/// Handler for the `install` command.
pub struct InstallHandler;

impl CommandHandler for InstallHandler {
    type Args = InstallArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        if args.manager.repo_url().is_none() {
            return Err(CliError::Manager(ManagerError::MissingRepoConfig));
        }

        ctx.output.println(&format!("Installing {}...", args.name));

        let progress_callback = ctx.output.create_progress_callback();
        let summary = ctx.packages.install(
            &args.manager,
            &args.name,
            args.destination.as_deref(),
            Some(progress_callback),
        )?;

        ctx.output.newline();
        ctx.output.header(&format!("Install Summary ({})", summary.requested));
        for line in &summary.packages {
            ctx.output.indented(&describe(line));
        }
        ctx.output.newline();

        if let Some(reason) = summary.requested_failure() {
            return Err(CliError::Install {
                package: summary.requested.clone(),
                reason: reason.to_string(),
            });
        }

        let failed = summary.failed_dependencies();
        if !failed.is_empty() {
            for name in &failed {
                ctx.output
                    .warning(&format!("dependency {} was not installed", name));
            }
            return Err(CliError::IncompleteInstall {
                package: summary.requested.clone(),
                failed,
            });
        }

        ctx.output.success(&format!(
            "{} installed into {}",
            summary.requested,
            summary.destination.display()
        ));
        Ok(())
    }
}

/// One summary line per visited package.
fn describe(line: &PackageLine) -> String {
    let mut text = line.name.clone();
    if let Some(ref label) = line.version_label {
        text.push_str(&format!(" (version {})", label));
    }
    if let Some(ref parent) = line.requested_by {
        text.push_str(&format!(" <- {}", parent));
    }

    let status = match &line.status {
        PackageStatus::Installed { archive, entries } => {
            format!("installed from {} ({} files)", archive, entries)
        }
        PackageStatus::AlreadyInstalled => "already installed".to_string(),
        PackageStatus::AlreadyVisited => "already handled".to_string(),
        PackageStatus::Failed(reason) => format!("FAILED: {}", reason),
    };

    format!("{} - {}", text, status)
}

// ============================================================================
// List Handler
// ============================================================================

/// Handler for the `list` command.
pub struct ListHandler;

impl CommandHandler for ListHandler {
    type Args = ListArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let names = match ctx.packages.list(&args.store_root) {
            Ok(names) => names,
            Err(CliError::Manager(ManagerError::StoreUnavailable { path, .. })) => {
                ctx.output.println(&format!(
                    "Package directory not found: {}",
                    path.display()
                ));
                ctx.output
                    .println("Use 'tsukumo install <name>' to install packages.");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if names.is_empty() {
            ctx.output.println("No packages installed.");
            return Ok(());
        }

        ctx.output.println("Installed packages:");
        for name in &names {
            ctx.output.indented(&format!("- {}", name));
        }

        Ok(())
    }
}

// ============================================================================
// Pack Handler
// ============================================================================

/// Handler for the `pack` command.
pub struct PackHandler;

impl CommandHandler for PackHandler {
    type Args = PackArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let filename = args
            .output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !allowed_file(&filename) {
            return Err(CliError::Manager(ManagerError::InvalidExtension { filename }));
        }

        let result = ctx.packages.pack(&args.output, &args.files)?;

        ctx.output.success(&format!(
            "Packed {} file(s) into {}",
            result.entries,
            result.output.display()
        ));
        ctx.output.indented(&format!("SHA-256: {}", result.checksum));
        Ok(())
    }
}
