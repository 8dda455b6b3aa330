//! Package metadata embedded in archives as `metadata.json`.
//!
//! Metadata is optional. A package whose archive has no `metadata.json`, or
//! whose `metadata.json` cannot be parsed, is treated as having no
//! dependencies. [`MetadataLookup`] keeps the two cases apart for callers
//! that want to report them differently.

use serde_json::{Map, Value};

use super::entry::ArchiveEntry;

/// Name of the archive entry holding package metadata.
pub const METADATA_ENTRY: &str = "metadata.json";

/// Key of the dependency mapping inside a metadata record.
const DEPENDENCIES_KEY: &str = "dependencies";

/// A dependency declared by a package.
///
/// The version label is informational only; it is reported but never
/// compared or enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Bare name of the required package.
    pub name: String,
    /// Version label as written in the metadata.
    pub version: String,
}

/// A parsed metadata record.
///
/// Structurally a JSON object; keys keep their document order so that
/// dependencies are installed in the order the package author listed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    fields: Map<String, Value>,
}

impl Metadata {
    /// Parse a metadata record from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let fields: Map<String, Value> = serde_json::from_slice(bytes)?;
        Ok(Self { fields })
    }

    /// Look up a raw metadata field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Declared dependencies in document order.
    ///
    /// Returns an empty list when no `dependencies` object is present.
    /// Non-string version labels are rendered as their JSON text.
    pub fn dependencies(&self) -> Vec<Dependency> {
        match self.fields.get(DEPENDENCIES_KEY) {
            Some(Value::Object(deps)) => deps
                .iter()
                .map(|(name, version)| Dependency {
                    name: name.clone(),
                    version: match version {
                        Value::String(label) => label.clone(),
                        other => other.to_string(),
                    },
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether a `dependencies` key exists but is not a JSON object.
    pub fn has_invalid_dependencies(&self) -> bool {
        matches!(self.fields.get(DEPENDENCIES_KEY), Some(v) if !v.is_object())
    }
}

/// Outcome of searching decoded entries for metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataLookup {
    /// No `metadata.json` entry in the archive.
    Missing,
    /// A `metadata.json` entry exists but is not a valid JSON object.
    Malformed(String),
    /// Metadata parsed successfully.
    Found(Metadata),
}

impl MetadataLookup {
    /// Collapse the lookup into the "metadata is optional" view.
    pub fn into_metadata(self) -> Option<Metadata> {
        match self {
            Self::Found(metadata) => Some(metadata),
            Self::Missing | Self::Malformed(_) => None,
        }
    }

    /// Dependencies declared by the metadata, empty when absent or malformed.
    pub fn dependencies(&self) -> Vec<Dependency> {
        match self {
            Self::Found(metadata) => metadata.dependencies(),
            Self::Missing | Self::Malformed(_) => Vec::new(),
        }
    }
}

/// Reads package metadata out of decoded archive entries.
#[derive(Debug, Clone)]
pub struct MetadataReader {
    entry_name: String,
}

impl Default for MetadataReader {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataReader {
    /// Create a reader looking for the standard `metadata.json` entry.
    pub fn new() -> Self {
        Self::with_entry_name(METADATA_ENTRY)
    }

    /// Create a reader looking for a differently named entry.
    pub fn with_entry_name(entry_name: impl Into<String>) -> Self {
        Self {
            entry_name: entry_name.into(),
        }
    }

    /// Name of the entry this reader looks for.
    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    /// Find and parse the first metadata entry.
    ///
    /// The entry name must match exactly; `./metadata.json` or
    /// `pkg/metadata.json` are not metadata.
    pub fn lookup(&self, entries: &[ArchiveEntry]) -> MetadataLookup {
        match entries.iter().find(|e| e.name == self.entry_name) {
            None => MetadataLookup::Missing,
            Some(entry) => match Metadata::from_slice(&entry.data) {
                Ok(metadata) => MetadataLookup::Found(metadata),
                Err(e) => MetadataLookup::Malformed(e.to_string()),
            },
        }
    }

    /// Extract metadata, treating malformed records as absent.
    pub fn extract(&self, entries: &[ArchiveEntry]) -> Option<Metadata> {
        self.lookup(entries).into_metadata()
    }
}
