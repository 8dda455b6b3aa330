//! Local package store.
//!
//! The store is a single directory holding fetched archives, the files
//! extracted from them, uploaded archives, and the install manifest.
//! Writers serialize on a per-store lock so the repository service and an
//! installer can share one store.

use std::fs;
use std::path::{Component, Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::error::{ManagerError, ManagerResult};
use super::manifest::{InstallManifest, InstalledRecord, MANIFEST_FILENAME};
use crate::package::ArchiveEntry;

/// Prefix of the staging directories used while bundling uploads.
pub const STAGING_PREFIX: &str = ".compile-";

/// Whether a name refers to exactly one path component directly under a root.
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Whether a top-level name belongs to the store itself rather than to a package.
///
/// Covers the install manifest, its temporary sibling, and staging directories.
pub fn is_reserved_name(name: &str) -> bool {
    name.starts_with(MANIFEST_FILENAME) || name.starts_with(STAGING_PREFIX)
}

/// Resolve an archive entry name to a relative path that stays inside the root.
fn entry_path(name: &str) -> ManagerResult<PathBuf> {
    let mut relative = PathBuf::new();

    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ManagerError::InvalidEntryPath {
                    entry: name.to_string(),
                });
            }
        }
    }

    let reserved = relative
        .iter()
        .next()
        .is_some_and(|top| is_reserved_name(&top.to_string_lossy()));
    if relative.as_os_str().is_empty() || reserved {
        return Err(ManagerError::InvalidEntryPath {
            entry: name.to_string(),
        });
    }

    Ok(relative)
}

/// On-disk package store rooted at one directory.
#[derive(Debug)]
pub struct LocalStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalStore {
    /// Create a store handle without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Open a store, creating the root directory if it does not exist.
    pub fn open(root: impl Into<PathBuf>) -> ManagerResult<Self> {
        let store = Self::new(root);
        fs::create_dir_all(&store.root).map_err(|e| ManagerError::CreateDirFailed {
            path: store.root.clone(),
            source: e,
        })?;
        Ok(store)
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the install manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILENAME)
    }

    /// True iff a file or directory named `name` exists directly under the root.
    ///
    /// The check is literal: `core` and `core.tar.gz` are different names.
    /// Reserved store files never exist as packages.
    pub fn exists(&self, name: &str) -> bool {
        is_plain_name(name) && !is_reserved_name(name) && self.root.join(name).exists()
    }

    /// True if `name` exists under the root or was recorded as installed.
    pub fn is_installed(&self, name: &str) -> bool {
        if self.exists(name) {
            return true;
        }

        match self.manifest() {
            Ok(manifest) => manifest.contains(name),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable install manifest");
                false
            }
        }
    }

    /// Path of a stored name, if it exists.
    pub fn path_of(&self, name: &str) -> Option<PathBuf> {
        if self.exists(name) {
            Some(self.root.join(name))
        } else {
            None
        }
    }

    /// Write decoded archive entries into the root.
    ///
    /// Every entry name is checked before anything is written, so an archive
    /// with an escaping or reserved name leaves the store untouched. Parent
    /// directories are created as needed. Entries are written in order; if a
    /// write fails, the entries before it stay on disk.
    ///
    /// # Returns
    ///
    /// The number of entries written.
    pub fn write_entries(&self, entries: &[ArchiveEntry]) -> ManagerResult<usize> {
        let targets = entries
            .iter()
            .map(|entry| entry_path(&entry.name))
            .collect::<ManagerResult<Vec<_>>>()?;

        let _guard = self.write_lock.lock();

        for (entry, relative) in entries.iter().zip(targets) {
            let target = self.root.join(relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| ManagerError::StoreWriteFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }

            fs::write(&target, &entry.data).map_err(|e| ManagerError::StoreWriteFailed {
                path: target.clone(),
                source: e,
            })?;
            debug!(entry = %entry.name, bytes = entry.len(), "Wrote entry");
        }

        Ok(entries.len())
    }

    /// Write an archive file directly under the root.
    pub fn write_archive(&self, filename: &str, bytes: &[u8]) -> ManagerResult<PathBuf> {
        if !is_plain_name(filename) || is_reserved_name(filename) {
            return Err(ManagerError::InvalidPath(filename.to_string()));
        }

        let _guard = self.write_lock.lock();
        let path = self.root.join(filename);
        fs::write(&path, bytes).map_err(|e| ManagerError::StoreWriteFailed {
            path: path.clone(),
            source: e,
        })?;

        Ok(path)
    }

    /// List the names directly under the root, in directory order.
    ///
    /// Reserved store files are not listed.
    pub fn list(&self) -> ManagerResult<Vec<String>> {
        let unavailable = |e| ManagerError::StoreUnavailable {
            path: self.root.clone(),
            source: e,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(unavailable)? {
            let entry = entry.map_err(unavailable)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_reserved_name(&name) {
                continue;
            }
            names.push(name);
        }

        Ok(names)
    }

    /// Remove a stored file or directory and forget any manifest record of it.
    pub fn remove(&self, name: &str) -> ManagerResult<()> {
        let path = self
            .path_of(name)
            .ok_or_else(|| ManagerError::PackageNotFound {
                name: name.to_string(),
            })?;

        let _guard = self.write_lock.lock();
        let removed = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|e| ManagerError::StoreWriteFailed {
            path: path.clone(),
            source: e,
        })?;

        let manifest_path = self.manifest_path();
        let mut manifest = InstallManifest::load(&manifest_path)?;
        if manifest.remove(name).is_some() {
            manifest.save(&manifest_path)?;
        }

        Ok(())
    }

    /// Load the install manifest.
    pub fn manifest(&self) -> ManagerResult<InstallManifest> {
        InstallManifest::load(&self.manifest_path())
    }

    /// Record a package as installed under its bare name.
    pub fn record_install(&self, name: &str, record: InstalledRecord) -> ManagerResult<()> {
        let _guard = self.write_lock.lock();
        let path = self.manifest_path();
        let mut manifest = InstallManifest::load(&path)?;
        manifest.insert(name, record);
        manifest.save(&path)
    }
}
