//! Trait definitions for package manager collaborators.
//!
//! These traits enable dependency injection and testing of the installer
//! without network access or real archives.

use crate::package::{ArchiveEntry, ArchiveFormat};

use super::ManagerResult;

/// Retrieves archive bytes from a remote repository.
pub trait Fetcher: Send + Sync {
    /// Fetch a resource from a repository.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The repository base URL
    /// * `resource` - The resource name (e.g. `core.tar.gz`)
    ///
    /// # Returns
    ///
    /// `Ok(Some(bytes))` on a success status, `Ok(None)` when the repository
    /// answered with any other status. Transport failures are errors.
    /// Implementations issue a single request and never retry.
    fn fetch(&self, base_url: &str, resource: &str) -> ManagerResult<Option<Vec<u8>>>;
}

/// Encodes and decodes archive containers.
pub trait ArchiveCodec: Send + Sync {
    /// Decode an archive into its file entries, in container order.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveCorrupt` if the bytes are not a valid container.
    fn decode(&self, bytes: &[u8]) -> ManagerResult<Vec<ArchiveEntry>>;

    /// Encode entries into an archive of the given format, preserving order.
    fn encode(&self, entries: &[ArchiveEntry], format: ArchiveFormat) -> ManagerResult<Vec<u8>>;
}

/// Build the URL of a resource in a repository.
///
/// A trailing `/` on the base URL is not doubled.
pub fn resource_url(base_url: &str, resource: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), resource)
}
