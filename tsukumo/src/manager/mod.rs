//! Package manager for fetching, storing, and installing packages.
//!
//! # Overview
//!
//! The manager handles:
//! - Fetching package archives from a remote repository
//! - Decoding `.tar` and `.tar.gz` archives
//! - Writing archive entries into a local store
//! - Installing the dependencies a package declares in `metadata.json`
//!
//! # Architecture
//!
//! The installer is composed from narrow collaborators so tests can swap in fakes:
//!
//! - [`Fetcher`] - Retrieves archive bytes ([`HttpFetcher`] over HTTP)
//! - [`ArchiveCodec`] - Decodes and encodes archives ([`TarCodec`])
//! - [`LocalStore`] - The on-disk store and its install manifest
//! - [`MetadataReader`](crate::package::MetadataReader) - Reads declared dependencies
//!
//! # Example
//!
//! ```no_run
//! use tsukumo::manager::{HttpFetcher, ManagerConfig, PackageInstaller, TarCodec};
//!
//! let config = ManagerConfig::new("repository").with_repo_url("http://localhost:8000");
//! let fetcher = HttpFetcher::with_timeout(config.timeout)?;
//! let installer = PackageInstaller::new(&config, fetcher, TarCodec::new())?;
//!
//! let report = installer.install("app");
//! for (name, error) in report.failures() {
//!     eprintln!("{}: {}", name, error);
//! }
//! # Ok::<(), tsukumo::manager::ManagerError>(())
//! ```

pub mod checksum;
mod config;
mod error;
mod extractor;
mod fetcher;
mod installer;
mod local;
mod manifest;
mod traits;

pub use config::ManagerConfig;
pub use error::{ManagerError, ManagerResult};
pub use extractor::TarCodec;
pub use fetcher::{HttpFetcher, DEFAULT_TIMEOUT_SECS};
pub use installer::{
    InstallProgressCallback, InstallReport, InstallStage, PackageInstaller, PackageOutcome,
    PackageRecord,
};
pub use local::{is_plain_name, is_reserved_name, LocalStore, STAGING_PREFIX};
pub use manifest::{InstallManifest, InstalledRecord, RecordedDependency, MANIFEST_FILENAME};
pub use traits::{resource_url, ArchiveCodec, Fetcher};
