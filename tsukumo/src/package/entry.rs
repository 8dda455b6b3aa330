//! Decoded archive entry type.

use std::fmt;

/// A single named file decoded from (or destined for) an archive.
///
/// Entry names are relative paths using `/` separators, exactly as they
/// appear in the container.
#[derive(Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Relative path of the entry inside the archive.
    pub name: String,
    /// File contents.
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    /// Create a new entry.
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Size of the entry contents in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the entry has no contents.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// Contents are elided so that debug output of large archives stays readable.
impl fmt::Debug for ArchiveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("name", &self.name)
            .field("len", &self.data.len())
            .finish()
    }
}
