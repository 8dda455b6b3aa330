//! Integration tests for the install pipeline over real HTTP.
//!
//! A repository service is started over a fixture store and packages are
//! installed from it with `HttpFetcher`, exercising fetch, decode, write,
//! and dependency resolution end to end.
//!
//! Run with: `cargo test --test install_pipeline`

mod common;

use std::time::Duration;

use tempfile::TempDir;

use tsukumo::manager::{
    HttpFetcher, LocalStore, ManagerConfig, ManagerError, PackageInstaller, PackageOutcome,
    TarCodec,
};
use tsukumo::package::ArchiveFormat;

use common::{package_archive, spawn_repository};

// ============================================================================
// Helper Functions
// ============================================================================

/// Publish archives into a fixture repository and return its base URL.
fn repository(temp: &TempDir, packages: &[(&str, ArchiveFormat, &[(&str, &str)])]) -> String {
    let root = temp.path().join("remote");
    let store = LocalStore::open(&root).unwrap();
    for (name, format, deps) in packages {
        let filename = format!("{}.{}", name, format.extension());
        store
            .write_archive(&filename, &package_archive(*format, name, deps))
            .unwrap();
    }

    let addr = spawn_repository(&root);
    format!("http://{}/packages", addr)
}

fn installer(temp: &TempDir, repo_url: &str) -> PackageInstaller<HttpFetcher, TarCodec> {
    let config = ManagerConfig::new(temp.path().join("local"))
        .with_repo_url(repo_url)
        .with_timeout(Duration::from_secs(10));
    let fetcher = HttpFetcher::with_timeout(config.timeout).unwrap();
    PackageInstaller::new(&config, fetcher, TarCodec::new()).unwrap()
}

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_installs_dependency_tree_over_http() {
    let temp = TempDir::new().unwrap();
    let url = repository(
        &temp,
        &[
            (
                "app",
                ArchiveFormat::TarGz,
                &[("core", "1.0"), ("utils", "0.3")],
            ),
            ("core", ArchiveFormat::Tar, &[]),
            ("utils", ArchiveFormat::TarGz, &[("core", "1.0")]),
        ],
    );
    let installer = installer(&temp, &url);

    let report = installer.install("app");
    let root = installer.store().root();

    assert_eq!(report.installed(), vec!["app", "core", "utils"]);
    assert!(report.failures().is_empty());
    for name in ["app", "core", "utils"] {
        assert!(root.join(name).join("lib.txt").exists(), "{} missing", name);
    }
    assert!(root.join("app.tar.gz").exists());
    assert!(root.join("core.tar").exists());

    // utils declared core again; it was already handled in this install
    assert!(matches!(
        report.records().last().map(|r| &r.outcome),
        Some(PackageOutcome::AlreadyVisited)
    ));
}

#[test]
fn test_second_install_fetches_nothing() {
    let temp = TempDir::new().unwrap();
    let url = repository(&temp, &[("solo", ArchiveFormat::TarGz, &[])]);
    let installer = installer(&temp, &url);

    assert_eq!(installer.install("solo").installed(), vec!["solo"]);

    // Remove the archive from the remote; a second install must not need it
    let remote = LocalStore::new(temp.path().join("remote"));
    remote.remove("solo.tar.gz").unwrap();

    let second = installer.install("solo");
    assert!(matches!(
        second.outcome("solo"),
        Some(PackageOutcome::AlreadyInstalled)
    ));
}

#[test]
fn test_missing_dependency_is_reported_not_fatal() {
    let temp = TempDir::new().unwrap();
    let url = repository(
        &temp,
        &[
            ("app", ArchiveFormat::TarGz, &[("ghost", "1"), ("core", "1")]),
            ("core", ArchiveFormat::TarGz, &[]),
        ],
    );
    let installer = installer(&temp, &url);

    let report = installer.install("app");

    assert!(report.is_success());
    assert_eq!(report.installed(), vec!["app", "core"]);
    let failures = report.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "ghost");
    assert!(matches!(failures[0].1, ManagerError::FetchNotFound { .. }));
}

#[test]
fn test_install_to_destination_over_http() {
    let temp = TempDir::new().unwrap();
    let url = repository(
        &temp,
        &[
            ("app", ArchiveFormat::Tar, &[("core", "1")]),
            ("core", ArchiveFormat::Tar, &[]),
        ],
    );
    let installer = installer(&temp, &url);
    let dest = temp.path().join("vendor");

    let report = installer.install_to("app", &dest).unwrap();

    assert_eq!(report.installed(), vec!["app", "core"]);
    assert!(dest.join("app/lib.txt").exists());
    assert!(dest.join("core/lib.txt").exists());
    assert!(LocalStore::new(&dest).is_installed("core"));
    assert!(!installer.store().is_installed("core"));
}

#[test]
fn test_unreachable_repository_fails_package() {
    let temp = TempDir::new().unwrap();
    // Nothing listens on port 1
    let installer = installer(&temp, "http://127.0.0.1:1");

    let report = installer.install("app");

    match report.into_result() {
        Err(ManagerError::FetchNotFound { name, tried }) => {
            assert_eq!(name, "app");
            assert_eq!(tried, vec!["app.tar.gz", "app.tar"]);
        }
        other => panic!("unexpected result {:?}", other),
    }
}
