//! Persisted record of packages installed into a store.
//!
//! Archives are written under their extension-qualified resource name
//! (`core.tar.gz`) while installs are requested by bare name (`core`), so the
//! store cannot tell from file names alone which packages are installed.
//! The manifest records installed bare names explicitly.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{ManagerError, ManagerResult};
use crate::package::Dependency;

/// Filename of the install manifest inside a store root.
pub const MANIFEST_FILENAME: &str = ".tsukumo-installed.json";

/// A dependency as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedDependency {
    /// Bare package name of the dependency.
    pub name: String,
    /// Version label as declared; informational only.
    pub version: String,
}

impl From<&Dependency> for RecordedDependency {
    fn from(dep: &Dependency) -> Self {
        Self {
            name: dep.name.clone(),
            version: dep.version.clone(),
        }
    }
}

/// Information about one installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledRecord {
    /// Archive filename the package was installed from.
    pub archive: String,
    /// SHA-256 of the archive bytes.
    pub checksum: String,
    /// Entry names written into the store.
    pub files: Vec<String>,
    /// Dependencies declared by the package metadata.
    #[serde(default)]
    pub dependencies: Vec<RecordedDependency>,
    /// RFC 3339 timestamp of the installation.
    pub installed_at: String,
}

/// Installation manifest tracking all installed packages by bare name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallManifest {
    /// Records keyed by bare package name.
    #[serde(default)]
    pub packages: BTreeMap<String, InstalledRecord>,
}

impl InstallManifest {
    /// Load the manifest from a file, returning an empty manifest if it is missing.
    pub fn load(path: &Path) -> ManagerResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read(path).map_err(|e| ManagerError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_slice(&content).map_err(|e| ManagerError::ManifestCorrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save the manifest, replacing the previous file atomically.
    pub fn save(&self, path: &Path) -> ManagerResult<()> {
        let content =
            serde_json::to_vec_pretty(self).map_err(|e| ManagerError::ManifestCorrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| ManagerError::StoreWriteFailed {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, path).map_err(|e| ManagerError::StoreWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Whether a bare name is recorded as installed.
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Look up the record for a bare name.
    pub fn get(&self, name: &str) -> Option<&InstalledRecord> {
        self.packages.get(name)
    }

    /// Insert or replace a record.
    pub fn insert(&mut self, name: impl Into<String>, record: InstalledRecord) {
        self.packages.insert(name.into(), record);
    }

    /// Remove a record, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<InstalledRecord> {
        self.packages.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(archive: &str) -> InstalledRecord {
        InstalledRecord {
            archive: archive.to_string(),
            checksum: "abc123".to_string(),
            files: vec!["README".to_string()],
            dependencies: vec![RecordedDependency {
                name: "core".to_string(),
                version: "1.0".to_string(),
            }],
            installed_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_load_missing_is_empty() {
        let temp = TempDir::new().unwrap();
        let manifest = InstallManifest::load(&temp.path().join(MANIFEST_FILENAME)).unwrap();
        assert!(manifest.packages.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(MANIFEST_FILENAME);

        let mut manifest = InstallManifest::default();
        manifest.insert("app", record("app.tar.gz"));
        manifest.save(&path).unwrap();

        let loaded = InstallManifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);
        assert!(loaded.contains("app"));
        assert_eq!(loaded.get("app").unwrap().dependencies[0].name, "core");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_manifest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(MANIFEST_FILENAME);
        fs::write(&path, "not json").unwrap();

        let result = InstallManifest::load(&path);
        assert!(matches!(result, Err(ManagerError::ManifestCorrupt { .. })));
    }

    #[test]
    fn test_remove() {
        let mut manifest = InstallManifest::default();
        manifest.insert("app", record("app.tar"));
        assert!(manifest.remove("app").is_some());
        assert!(manifest.remove("app").is_none());
        assert!(!manifest.contains("app"));
    }
}
