//! Centralized package naming conventions.
//!
//! This module is the single source of truth for how a bare package name maps
//! onto archive resources:
//! - Archive extensions and their trial order (`tar.gz` before `tar`)
//! - Resource names (e.g., `core.tar.gz`)
//! - Upload filename validation against the extension allow-list
//!
//! All other modules should use these functions rather than constructing names directly.

use std::fmt;

/// Archive container formats understood by the package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Gzip-compressed tar archive (`.tar.gz`).
    TarGz,
    /// Uncompressed tar archive (`.tar`).
    Tar,
}

/// Formats in the order they are tried when resolving a package name.
pub const ARCHIVE_TRIAL_ORDER: [ArchiveFormat; 2] = [ArchiveFormat::TarGz, ArchiveFormat::Tar];

impl ArchiveFormat {
    /// The filename extension for this format, without a leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Tar => "tar",
        }
    }

    /// Detect the format from a filename's extension (case-insensitive).
    ///
    /// Returns `None` when the extension is not on the allow-list or the
    /// filename has nothing in front of the extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsukumo::package::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::from_filename("core.tar.gz"), Some(ArchiveFormat::TarGz));
    /// assert_eq!(ArchiveFormat::from_filename("core.TAR"), Some(ArchiveFormat::Tar));
    /// assert_eq!(ArchiveFormat::from_filename("core.zip"), None);
    /// ```
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        ARCHIVE_TRIAL_ORDER.into_iter().find(|format| {
            let suffix = format!(".{}", format.extension());
            lower.len() > suffix.len() && lower.ends_with(&suffix)
        })
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Build the remote resource name for a package in a given format.
///
/// # Examples
///
/// ```
/// use tsukumo::package::{resource_name, ArchiveFormat};
///
/// assert_eq!(resource_name("core", ArchiveFormat::TarGz), "core.tar.gz");
/// assert_eq!(resource_name("Core-Utils", ArchiveFormat::Tar), "Core-Utils.tar");
/// ```
pub fn resource_name(name: &str, format: ArchiveFormat) -> String {
    format!("{}.{}", name, format.extension())
}

/// Check whether a filename carries an allowed archive extension.
///
/// # Examples
///
/// ```
/// use tsukumo::package::allowed_file;
///
/// assert!(allowed_file("pkg.tar.gz"));
/// assert!(allowed_file("pkg.tar"));
/// assert!(!allowed_file("pkg.zip"));
/// assert!(!allowed_file("pkg"));
/// ```
pub fn allowed_file(filename: &str) -> bool {
    ArchiveFormat::from_filename(filename).is_some()
}
