//! Concrete implementations of the service traits.
//!
//! These implementations wrap the tsukumo manager, adapting it to the trait
//! interfaces used by handlers.

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use tracing::info;
use tsukumo::checksum::calculate_checksum;
use tsukumo::manager::{
    ArchiveCodec, HttpFetcher, InstallStage, LocalStore, ManagerConfig, ManagerError,
    PackageInstaller, TarCodec,
};
use tsukumo::package::{ArchiveEntry, ArchiveFormat};

use super::traits::{InstallSummary, Output, PackResult, PackageService, ProgressCallback};
use crate::error::CliError;

// ============================================================================
// Console Output Implementation
// ============================================================================

/// Standard console output implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    /// Create a new console output.
    pub fn new() -> Self {
        Self
    }
}

impl Output for ConsoleOutput {
    fn println(&self, message: &str) {
        println!("{}", message);
    }

    fn header(&self, title: &str) {
        println!("{}", style(title).bold());
        println!("{}", "=".repeat(title.len()));
    }

    fn warning(&self, message: &str) {
        println!("{} {}", style("Warning:").yellow().bold(), message);
    }

    fn success(&self, message: &str) {
        println!("{} {}", style("Success:").green().bold(), message);
    }

    fn create_progress_callback(&self) -> ProgressCallback {
        Box::new(|package, stage| match stage {
            InstallStage::Complete => println!("  {} {}", style("done").green(), package),
            _ => println!("  {} {}", style(stage.name()).dim(), package),
        })
    }
}

// ============================================================================
// Default Package Service Implementation
// ============================================================================

/// Default implementation of the package service.
///
/// Installs over HTTP and reads and writes the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPackageService {
    codec: TarCodec,
}

impl DefaultPackageService {
    /// Create a new default package service.
    pub fn new() -> Self {
        Self {
            codec: TarCodec::new(),
        }
    }
}

impl PackageService for DefaultPackageService {
    fn install(
        &self,
        config: &ManagerConfig,
        name: &str,
        destination: Option<&Path>,
        on_progress: Option<ProgressCallback>,
    ) -> Result<InstallSummary, CliError> {
        let fetcher = HttpFetcher::with_timeout(config.timeout)?;
        let mut installer = PackageInstaller::new(config, fetcher, self.codec)?;
        if let Some(callback) = on_progress {
            installer = installer.with_progress(callback);
        }

        let report = match destination {
            Some(dest) => installer.install_to(name, dest)?,
            None => installer.install(name),
        };

        Ok(InstallSummary::from(&report))
    }

    fn list(&self, store_root: &Path) -> Result<Vec<String>, CliError> {
        Ok(LocalStore::new(store_root).list()?)
    }

    fn pack(&self, output: &Path, files: &[PathBuf]) -> Result<PackResult, CliError> {
        let filename = output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let format = ArchiveFormat::from_filename(&filename)
            .ok_or(ManagerError::InvalidExtension { filename })?;

        let mut entries = Vec::with_capacity(files.len());
        for path in files {
            let data = fs::read(path).map_err(|error| CliError::FileRead {
                path: path.clone(),
                error,
            })?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| ManagerError::InvalidPath(path.display().to_string()))?;
            entries.push(ArchiveEntry::new(name, data));
        }

        let bytes = self.codec.encode(&entries, format)?;
        fs::write(output, &bytes).map_err(|error| CliError::FileWrite {
            path: output.to_path_buf(),
            error,
        })?;

        let checksum = calculate_checksum(&bytes);
        info!(output = %output.display(), entries = entries.len(), %checksum, "Packed archive");

        Ok(PackResult {
            output: output.to_path_buf(),
            entries: entries.len(),
            checksum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pack_writes_decodable_archive() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        let b = temp.path().join("metadata.json");
        fs::write(&a, b"alpha").unwrap();
        fs::write(&b, br#"{"dependencies": {}}"#).unwrap();
        let output = temp.path().join("bundle.tar.gz");

        let service = DefaultPackageService::new();
        let result = service.pack(&output, &[a, b]).unwrap();

        assert_eq!(result.entries, 2);
        let bytes = fs::read(&output).unwrap();
        assert!(TarCodec::is_gzip(&bytes));
        assert_eq!(result.checksum, calculate_checksum(&bytes));

        let entries = TarCodec::new().decode(&bytes).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "metadata.json"]);
    }

    #[test]
    fn test_pack_plain_tar() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        fs::write(&a, b"alpha").unwrap();
        let output = temp.path().join("bundle.tar");

        DefaultPackageService::new().pack(&output, &[a]).unwrap();
        assert!(!TarCodec::is_gzip(&fs::read(&output).unwrap()));
    }

    #[test]
    fn test_pack_missing_input() {
        let temp = TempDir::new().unwrap();
        let result = DefaultPackageService::new().pack(
            &temp.path().join("out.tar"),
            &[temp.path().join("missing.txt")],
        );

        assert!(matches!(result, Err(CliError::FileRead { .. })));
        assert!(!temp.path().join("out.tar").exists());
    }

    #[test]
    fn test_list_missing_store() {
        let temp = TempDir::new().unwrap();
        let result = DefaultPackageService::new().list(&temp.path().join("nope"));
        assert!(matches!(
            result,
            Err(CliError::Manager(ManagerError::StoreUnavailable { .. }))
        ));
    }
}
