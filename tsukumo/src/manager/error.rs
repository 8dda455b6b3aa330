//! Error types for the package manager.

use std::io;
use std::path::PathBuf;

/// Result type for manager operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Errors that can occur while fetching, decoding, storing, or installing packages.
#[derive(Debug)]
pub enum ManagerError {
    /// No repository base URL was configured.
    MissingRepoConfig,

    /// None of the archive variants of a package could be retrieved.
    FetchNotFound { name: String, tried: Vec<String> },

    /// A download request failed at the transport level.
    DownloadFailed { url: String, reason: String },

    /// Network timeout.
    Timeout { url: String, timeout_secs: u64 },

    /// HTTP client error outside of a specific download.
    HttpError(String),

    /// A byte stream could not be decoded as an archive.
    ArchiveCorrupt { name: String, reason: String },

    /// Building an archive from entries failed.
    ArchiveBuildFailed(String),

    /// Failed to write into the store.
    StoreWriteFailed { path: PathBuf, source: io::Error },

    /// The store root does not exist or cannot be listed.
    StoreUnavailable { path: PathBuf, source: io::Error },

    /// Failed to read a file or directory.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// An archive entry would be written outside of the target directory.
    InvalidEntryPath { entry: String },

    /// The install manifest exists but cannot be parsed.
    ManifestCorrupt { path: PathBuf, reason: String },

    /// Nothing with this name exists in the store.
    PackageNotFound { name: String },

    /// The filename does not carry an allowed archive extension.
    InvalidExtension { filename: String },

    /// Invalid path provided.
    InvalidPath(String),
}

impl std::fmt::Display for ManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRepoConfig => {
                write!(f, "no repository URL configured")
            }
            Self::FetchNotFound { name, tried } => {
                write!(
                    f,
                    "package {} not found in repository (tried {})",
                    name,
                    tried.join(", ")
                )
            }
            Self::DownloadFailed { url, reason } => {
                write!(f, "failed to download {}: {}", url, reason)
            }
            Self::Timeout { url, timeout_secs } => {
                write!(f, "request to {} timed out after {}s", url, timeout_secs)
            }
            Self::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            Self::ArchiveCorrupt { name, reason } => {
                write!(f, "archive {} is corrupt: {}", name, reason)
            }
            Self::ArchiveBuildFailed(reason) => {
                write!(f, "failed to build archive: {}", reason)
            }
            Self::StoreWriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Self::StoreUnavailable { path, source } => {
                write!(f, "store {} is unavailable: {}", path.display(), source)
            }
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::CreateDirFailed { path, source } => {
                write!(
                    f,
                    "failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::InvalidEntryPath { entry } => {
                write!(f, "archive entry {} escapes the target directory", entry)
            }
            Self::ManifestCorrupt { path, reason } => {
                write!(
                    f,
                    "install manifest {} is corrupt: {}",
                    path.display(),
                    reason
                )
            }
            Self::PackageNotFound { name } => write!(f, "package not found: {}", name),
            Self::InvalidExtension { filename } => {
                write!(
                    f,
                    "invalid file format for {}: only .tar and .tar.gz files are allowed",
                    filename
                )
            }
            Self::InvalidPath(msg) => write!(f, "invalid path: {}", msg),
        }
    }
}

impl std::error::Error for ManagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StoreWriteFailed { source, .. } => Some(source),
            Self::StoreUnavailable { source, .. } => Some(source),
            Self::ReadFailed { source, .. } => Some(source),
            Self::CreateDirFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
