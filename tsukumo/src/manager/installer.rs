//! Package installer for fetching packages and their dependencies.
//!
//! This module orchestrates the full installation workflow for one package:
//! 1. Fetch the archive, trying each allowed extension in order
//! 2. Store the archive under its resource name
//! 3. Decode the archive and write its entries into the store
//! 4. Record the installation in the store's manifest
//! 5. Read `metadata.json` and install each declared dependency
//!
//! Dependencies are installed depth-first, one package at a time. A failure
//! in one package is recorded in the [`InstallReport`] and never aborts its
//! siblings or its parent.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::package::{
    resource_name, ArchiveEntry, Dependency, MetadataLookup, MetadataReader, ARCHIVE_TRIAL_ORDER,
};

use super::checksum::calculate_checksum;
use super::config::ManagerConfig;
use super::error::{ManagerError, ManagerResult};
use super::local::LocalStore;
use super::manifest::{InstalledRecord, RecordedDependency};
use super::traits::{ArchiveCodec, Fetcher};

/// Progress callback for installation operations.
///
/// # Arguments
///
/// * `package` - Name of the package the stage applies to
/// * `stage` - Current installation stage
pub type InstallProgressCallback = Box<dyn Fn(&str, InstallStage) + Send + Sync>;

/// Installation stages for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    /// Fetching the package archive.
    Fetching,
    /// Decoding the archive.
    Decoding,
    /// Writing entries into the store.
    Writing,
    /// Installing declared dependencies.
    Resolving,
    /// Package and its dependencies processed.
    Complete,
}

impl InstallStage {
    /// Get a human-readable name for the stage.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fetching => "Fetching",
            Self::Decoding => "Decoding",
            Self::Writing => "Writing",
            Self::Resolving => "Resolving dependencies",
            Self::Complete => "Complete",
        }
    }
}

/// What happened to one package during an install.
#[derive(Debug)]
pub enum PackageOutcome {
    /// The package was fetched and its entries written.
    Installed {
        /// Archive filename the package was fetched as.
        archive: String,
        /// Number of entries written into the store.
        entries: usize,
    },
    /// The store already had the package; nothing was fetched.
    AlreadyInstalled,
    /// The package was already handled earlier in the same install.
    AlreadyVisited,
    /// The package could not be installed.
    Failed(ManagerError),
}

impl PackageOutcome {
    /// Whether this outcome is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// One visited package in an install.
#[derive(Debug)]
pub struct PackageRecord {
    /// Bare package name.
    pub name: String,
    /// Package whose metadata declared this one, `None` for the requested package.
    pub requested_by: Option<String>,
    /// Version label from the declaring metadata.
    pub version_label: Option<String>,
    /// Outcome for this package.
    pub outcome: PackageOutcome,
}

/// Result of a top-level install, one record per visited package in visit order.
#[derive(Debug)]
pub struct InstallReport {
    requested: String,
    destination: PathBuf,
    records: Vec<PackageRecord>,
}

impl InstallReport {
    /// The package the install was requested for.
    pub fn requested(&self) -> &str {
        &self.requested
    }

    /// Store root the install wrote into.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// All records in visit order.
    pub fn records(&self) -> &[PackageRecord] {
        &self.records
    }

    /// Outcome of the first visit to `name`.
    pub fn outcome(&self, name: &str) -> Option<&PackageOutcome> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.outcome)
    }

    /// Names of packages that were fetched and written, in install order.
    pub fn installed(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, PackageOutcome::Installed { .. }))
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Packages that failed, with their errors.
    pub fn failures(&self) -> Vec<(&str, &ManagerError)> {
        self.records
            .iter()
            .filter_map(|r| match &r.outcome {
                PackageOutcome::Failed(e) => Some((r.name.as_str(), e)),
                _ => None,
            })
            .collect()
    }

    /// Whether the requested package itself did not fail.
    ///
    /// Dependency failures do not count.
    pub fn is_success(&self) -> bool {
        !matches!(
            self.outcome(&self.requested),
            Some(PackageOutcome::Failed(_))
        )
    }

    /// Convert a failed requested package into its error.
    pub fn into_result(mut self) -> ManagerResult<Self> {
        let position = self
            .records
            .iter()
            .position(|r| r.name == self.requested && r.outcome.is_failure());

        match position {
            Some(index) => match self.records.remove(index).outcome {
                PackageOutcome::Failed(e) => Err(e),
                _ => Ok(self),
            },
            None => Ok(self),
        }
    }
}

/// Names visited during one top-level install.
#[derive(Debug, Default)]
struct InstallSession {
    visited: HashSet<String>,
}

impl InstallSession {
    fn contains(&self, name: &str) -> bool {
        self.visited.contains(name)
    }

    fn insert(&mut self, name: &str) {
        self.visited.insert(name.to_string());
    }
}

/// A package that was fetched and written.
struct FetchedPackage {
    archive: String,
    entries: usize,
    dependencies: Vec<Dependency>,
}

/// Package installer.
///
/// Owns the collaborators of the install pipeline; tests substitute fakes
/// for the fetcher and codec.
pub struct PackageInstaller<F: Fetcher, C: ArchiveCodec> {
    fetcher: F,
    codec: C,
    store: LocalStore,
    repo_url: String,
    metadata: MetadataReader,
    progress: Option<InstallProgressCallback>,
}

impl<F: Fetcher, C: ArchiveCodec> PackageInstaller<F, C> {
    /// Create a new package installer.
    ///
    /// Opens (and creates if needed) the store at `config.store_root`.
    ///
    /// # Errors
    ///
    /// Returns `MissingRepoConfig` if no repository URL is configured.
    pub fn new(config: &ManagerConfig, fetcher: F, codec: C) -> ManagerResult<Self> {
        let repo_url = config
            .repo_url()
            .ok_or(ManagerError::MissingRepoConfig)?
            .to_string();
        let store = LocalStore::open(&config.store_root)?;

        Ok(Self {
            fetcher,
            codec,
            store,
            repo_url,
            metadata: MetadataReader::new(),
            progress: None,
        })
    }

    /// Set a progress callback.
    pub fn with_progress(mut self, callback: InstallProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Use a custom metadata reader.
    pub fn with_metadata_reader(mut self, reader: MetadataReader) -> Self {
        self.metadata = reader;
        self
    }

    /// Get the default store.
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Get the repository base URL.
    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    /// Install a package and its dependencies into the default store.
    pub fn install(&self, name: &str) -> InstallReport {
        self.run(name, &self.store)
    }

    /// Install a package and its dependencies into `destination`.
    ///
    /// The destination is treated as a store of its own, with its own
    /// manifest, and is created if absent.
    pub fn install_to(&self, name: &str, destination: &Path) -> ManagerResult<InstallReport> {
        let store = LocalStore::open(destination)?;
        Ok(self.run(name, &store))
    }

    fn run(&self, name: &str, store: &LocalStore) -> InstallReport {
        info!(package = name, store = %store.root().display(), "Installing package");

        let mut session = InstallSession::default();
        let mut records = Vec::new();
        self.install_one(name, None, store, &mut session, &mut records);

        InstallReport {
            requested: name.to_string(),
            destination: store.root().to_path_buf(),
            records,
        }
    }

    fn report(&self, package: &str, stage: InstallStage) {
        if let Some(ref cb) = self.progress {
            cb(package, stage);
        }
    }

    fn install_one(
        &self,
        name: &str,
        parent: Option<(&str, &Dependency)>,
        store: &LocalStore,
        session: &mut InstallSession,
        records: &mut Vec<PackageRecord>,
    ) {
        let mut record = PackageRecord {
            name: name.to_string(),
            requested_by: parent.map(|(p, _)| p.to_string()),
            version_label: parent.map(|(_, dep)| dep.version.clone()),
            outcome: PackageOutcome::AlreadyVisited,
        };

        if session.contains(name) {
            info!(package = name, "Already visited in this install, skipping");
            records.push(record);
            return;
        }

        if store.is_installed(name) {
            info!(package = name, "Package already installed");
            record.outcome = PackageOutcome::AlreadyInstalled;
            records.push(record);
            return;
        }

        session.insert(name);

        let fetched = match self.install_package(name, store) {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(package = name, error = %e, "Failed to install package");
                record.outcome = PackageOutcome::Failed(e);
                records.push(record);
                return;
            }
        };

        info!(
            package = name,
            archive = %fetched.archive,
            entries = fetched.entries,
            "Installed package"
        );
        record.outcome = PackageOutcome::Installed {
            archive: fetched.archive,
            entries: fetched.entries,
        };
        records.push(record);

        if !fetched.dependencies.is_empty() {
            self.report(name, InstallStage::Resolving);
        }
        for dependency in &fetched.dependencies {
            info!(
                "Installing dependency {} (version {})",
                dependency.name, dependency.version
            );
            self.install_one(
                &dependency.name,
                Some((name, dependency)),
                store,
                session,
                records,
            );
        }

        self.report(name, InstallStage::Complete);
    }

    /// Fetch, store, decode, and write one package.
    fn install_package(&self, name: &str, store: &LocalStore) -> ManagerResult<FetchedPackage> {
        self.report(name, InstallStage::Fetching);
        let (archive, bytes) = self.fetch_archive(name)?;
        store.write_archive(&archive, &bytes)?;

        self.report(name, InstallStage::Decoding);
        let entries = self.codec.decode(&bytes).map_err(|e| match e {
            ManagerError::ArchiveCorrupt { reason, .. } => ManagerError::ArchiveCorrupt {
                name: archive.clone(),
                reason,
            },
            other => other,
        })?;

        self.report(name, InstallStage::Writing);
        let written = store.write_entries(&entries)?;

        let dependencies = self.read_dependencies(name, &entries);
        store.record_install(
            name,
            InstalledRecord {
                archive: archive.clone(),
                checksum: calculate_checksum(&bytes),
                files: entries.iter().map(|e| e.name.clone()).collect(),
                dependencies: dependencies.iter().map(RecordedDependency::from).collect(),
                installed_at: chrono::Utc::now().to_rfc3339(),
            },
        )?;

        Ok(FetchedPackage {
            archive,
            entries: written,
            dependencies,
        })
    }

    /// Try each allowed extension in order until the repository serves one.
    fn fetch_archive(&self, name: &str) -> ManagerResult<(String, Vec<u8>)> {
        let mut tried = Vec::with_capacity(ARCHIVE_TRIAL_ORDER.len());

        for format in ARCHIVE_TRIAL_ORDER {
            let resource = resource_name(name, format);
            match self.fetcher.fetch(&self.repo_url, &resource) {
                Ok(Some(bytes)) => return Ok((resource, bytes)),
                Ok(None) => debug!(resource = %resource, "Archive variant not available"),
                Err(e) => warn!(resource = %resource, error = %e, "Fetch failed"),
            }
            tried.push(resource);
        }

        Err(ManagerError::FetchNotFound {
            name: name.to_string(),
            tried,
        })
    }

    /// Dependencies declared by the package metadata, empty if absent or malformed.
    fn read_dependencies(&self, name: &str, entries: &[ArchiveEntry]) -> Vec<Dependency> {
        let lookup = self.metadata.lookup(entries);
        match &lookup {
            MetadataLookup::Missing => {
                debug!(package = name, "No metadata, assuming no dependencies")
            }
            MetadataLookup::Malformed(reason) => {
                warn!(package = name, reason = %reason, "Ignoring malformed metadata")
            }
            MetadataLookup::Found(metadata) if metadata.has_invalid_dependencies() => {
                warn!(package = name, "Ignoring non-object dependencies field")
            }
            MetadataLookup::Found(_) => {}
        }
        lookup.dependencies()
    }
}
