//! Tests for package command handlers.
//!
//! This module provides mock implementations of the service traits and
//! tests for each command handler.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tsukumo::manager::{InstallStage, ManagerConfig, ManagerError};

use super::args::*;
use super::handlers::*;
use super::traits::*;
use crate::error::CliError;

// ============================================================================
// Mock Output Implementation
// ============================================================================

/// Mock output that captures all messages for verification.
#[derive(Default)]
pub struct MockOutput {
    messages: Arc<RwLock<Vec<String>>>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured messages.
    pub fn messages(&self) -> Vec<String> {
        self.messages.read().unwrap().clone()
    }

    /// Check if any message contains the given substring.
    pub fn contains(&self, substring: &str) -> bool {
        self.messages
            .read()
            .unwrap()
            .iter()
            .any(|m| m.contains(substring))
    }
}

impl Output for MockOutput {
    fn println(&self, message: &str) {
        self.messages.write().unwrap().push(message.to_string());
    }

    fn create_progress_callback(&self) -> ProgressCallback {
        let messages = Arc::clone(&self.messages);
        Box::new(move |package, stage| {
            messages
                .write()
                .unwrap()
                .push(format!("[{}] {}", stage.name(), package));
        })
    }
}

// ============================================================================
// Mock Package Service Implementation
// ============================================================================

/// Recorded install call.
#[derive(Debug, Clone, PartialEq)]
struct InstallCall {
    name: String,
    destination: Option<PathBuf>,
    repo_url: Option<String>,
    store_root: PathBuf,
}

/// Mock package service returning canned results.
#[derive(Default)]
struct MockPackageService {
    summary: Option<InstallSummary>,
    names: Option<Vec<String>>,
    installs: RwLock<Vec<InstallCall>>,
    packs: RwLock<Vec<(PathBuf, Vec<PathBuf>)>>,
}

impl MockPackageService {
    fn with_summary(summary: InstallSummary) -> Self {
        Self {
            summary: Some(summary),
            ..Default::default()
        }
    }

    fn with_names(names: &[&str]) -> Self {
        Self {
            names: Some(names.iter().map(|n| n.to_string()).collect()),
            ..Default::default()
        }
    }

    fn installs(&self) -> Vec<InstallCall> {
        self.installs.read().unwrap().clone()
    }
}

impl PackageService for MockPackageService {
    fn install(
        &self,
        config: &ManagerConfig,
        name: &str,
        destination: Option<&Path>,
        on_progress: Option<ProgressCallback>,
    ) -> Result<InstallSummary, CliError> {
        self.installs.write().unwrap().push(InstallCall {
            name: name.to_string(),
            destination: destination.map(Path::to_path_buf),
            repo_url: config.repo_url().map(str::to_string),
            store_root: config.store_root.clone(),
        });

        if let Some(callback) = on_progress {
            callback(name, InstallStage::Fetching);
            callback(name, InstallStage::Complete);
        }

        self.summary
            .clone()
            .ok_or(CliError::Manager(ManagerError::MissingRepoConfig))
    }

    fn list(&self, store_root: &Path) -> Result<Vec<String>, CliError> {
        self.names.clone().ok_or_else(|| {
            CliError::Manager(ManagerError::StoreUnavailable {
                path: store_root.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            })
        })
    }

    fn pack(&self, output: &Path, files: &[PathBuf]) -> Result<PackResult, CliError> {
        self.packs
            .write()
            .unwrap()
            .push((output.to_path_buf(), files.to_vec()));
        Ok(PackResult {
            output: output.to_path_buf(),
            entries: files.len(),
            checksum: "ab".repeat(32),
        })
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn line(name: &str, parent: Option<&str>, status: PackageStatus) -> PackageLine {
    PackageLine {
        name: name.to_string(),
        requested_by: parent.map(str::to_string),
        version_label: parent.map(|_| "1.0".to_string()),
        status,
    }
}

fn installed(archive: &str) -> PackageStatus {
    PackageStatus::Installed {
        archive: archive.to_string(),
        entries: 2,
    }
}

fn summary(packages: Vec<PackageLine>) -> InstallSummary {
    InstallSummary {
        requested: "app".to_string(),
        destination: PathBuf::from("/srv/store"),
        packages,
    }
}

fn install_args(repo_url: Option<&str>) -> InstallArgs {
    let mut manager = ManagerConfig::new("/srv/store");
    if let Some(url) = repo_url {
        manager = manager.with_repo_url(url);
    }
    InstallArgs {
        name: "app".to_string(),
        destination: None,
        manager,
    }
}

// ============================================================================
// Install Handler Tests
// ============================================================================

#[test]
fn test_install_success_prints_tree_and_progress() {
    let output = MockOutput::new();
    let service = MockPackageService::with_summary(summary(vec![
        line("app", None, installed("app.tar.gz")),
        line("core", Some("app"), installed("core.tar")),
        line("utils", Some("core"), PackageStatus::AlreadyInstalled),
    ]));
    let ctx = CommandContext::new(&output, &service);

    InstallHandler::execute(install_args(Some("http://repo")), &ctx).unwrap();

    assert!(output.contains("Installing app..."));
    assert!(output.contains("[Fetching] app"));
    assert!(output.contains("[Complete] app"));
    assert!(output.contains("app - installed from app.tar.gz (2 files)"));
    assert!(output.contains("core (version 1.0) <- app - installed from core.tar"));
    assert!(output.contains("utils (version 1.0) <- core - already installed"));
    assert!(output.contains("Success: app installed into /srv/store"));

    let calls = service.installs();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].repo_url.as_deref(), Some("http://repo"));
    assert_eq!(calls[0].store_root, PathBuf::from("/srv/store"));
}

#[test]
fn test_install_without_repo_url_never_calls_service() {
    let output = MockOutput::new();
    let service = MockPackageService::default();
    let ctx = CommandContext::new(&output, &service);

    let result = InstallHandler::execute(install_args(None), &ctx);

    assert!(matches!(
        result,
        Err(CliError::Manager(ManagerError::MissingRepoConfig))
    ));
    assert!(service.installs().is_empty());
    assert!(output.messages().is_empty());
}

#[test]
fn test_install_passes_destination() {
    let output = MockOutput::new();
    let service =
        MockPackageService::with_summary(summary(vec![line("app", None, installed("app.tar"))]));
    let ctx = CommandContext::new(&output, &service);

    let mut args = install_args(Some("http://repo"));
    args.destination = Some(PathBuf::from("/tmp/elsewhere"));
    InstallHandler::execute(args, &ctx).unwrap();

    assert_eq!(
        service.installs()[0].destination,
        Some(PathBuf::from("/tmp/elsewhere"))
    );
}

#[test]
fn test_install_requested_failure_is_an_error() {
    let output = MockOutput::new();
    let service = MockPackageService::with_summary(summary(vec![line(
        "app",
        None,
        PackageStatus::Failed("package app not found in repository".to_string()),
    )]));
    let ctx = CommandContext::new(&output, &service);

    let result = InstallHandler::execute(install_args(Some("http://repo")), &ctx);

    match result {
        Err(CliError::Install { package, reason }) => {
            assert_eq!(package, "app");
            assert!(reason.contains("not found"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(output.contains("app - FAILED: package app not found in repository"));
}

#[test]
fn test_install_dependency_failure_keeps_parent() {
    let output = MockOutput::new();
    let service = MockPackageService::with_summary(summary(vec![
        line("app", None, installed("app.tar.gz")),
        line("core", Some("app"), PackageStatus::Failed("gone".to_string())),
        line("app", Some("core"), PackageStatus::AlreadyVisited),
    ]));
    let ctx = CommandContext::new(&output, &service);

    let result = InstallHandler::execute(install_args(Some("http://repo")), &ctx);

    match result {
        Err(CliError::IncompleteInstall { package, failed }) => {
            assert_eq!(package, "app");
            assert_eq!(failed, vec!["core".to_string()]);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(output.contains("Warning: dependency core was not installed"));
    assert!(output.contains("app (version 1.0) <- core - already handled"));
    assert!(!output.contains("Success:"));
}

// ============================================================================
// List Handler Tests
// ============================================================================

#[test]
fn test_list_prints_names_in_order() {
    let output = MockOutput::new();
    let service = MockPackageService::with_names(&["core.tar.gz", "docs", "app.tar"]);
    let ctx = CommandContext::new(&output, &service);

    ListHandler::execute(
        ListArgs {
            store_root: PathBuf::from("/srv/store"),
        },
        &ctx,
    )
    .unwrap();

    assert_eq!(
        output.messages(),
        vec![
            "Installed packages:".to_string(),
            "  - core.tar.gz".to_string(),
            "  - docs".to_string(),
            "  - app.tar".to_string(),
        ]
    );
}

#[test]
fn test_list_empty_store() {
    let output = MockOutput::new();
    let service = MockPackageService::with_names(&[]);
    let ctx = CommandContext::new(&output, &service);

    ListHandler::execute(
        ListArgs {
            store_root: PathBuf::from("/srv/store"),
        },
        &ctx,
    )
    .unwrap();

    assert_eq!(output.messages(), vec!["No packages installed.".to_string()]);
}

#[test]
fn test_list_missing_store_is_reported() {
    let output = MockOutput::new();
    let service = MockPackageService::default();
    let ctx = CommandContext::new(&output, &service);

    ListHandler::execute(
        ListArgs {
            store_root: PathBuf::from("/srv/missing"),
        },
        &ctx,
    )
    .unwrap();

    assert!(output.contains("Package directory not found: /srv/missing"));
}

// ============================================================================
// Pack Handler Tests
// ============================================================================

#[test]
fn test_pack_reports_checksum() {
    let output = MockOutput::new();
    let service = MockPackageService::default();
    let ctx = CommandContext::new(&output, &service);

    PackHandler::execute(
        PackArgs {
            output: PathBuf::from("bundle.tar.gz"),
            files: vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")],
        },
        &ctx,
    )
    .unwrap();

    assert!(output.contains("Packed 2 file(s) into bundle.tar.gz"));
    assert!(output.contains(&format!("SHA-256: {}", "ab".repeat(32))));
}

#[test]
fn test_pack_rejects_unknown_extension() {
    let output = MockOutput::new();
    let service = MockPackageService::default();
    let ctx = CommandContext::new(&output, &service);

    let result = PackHandler::execute(
        PackArgs {
            output: PathBuf::from("bundle.zip"),
            files: vec![PathBuf::from("a.txt")],
        },
        &ctx,
    );

    assert!(matches!(
        result,
        Err(CliError::Manager(ManagerError::InvalidExtension { .. }))
    ));
    assert!(service.packs.read().unwrap().is_empty());
}
