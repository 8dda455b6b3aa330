//! Package naming, archive entries, and embedded metadata.
//!
//! A package is identified by its bare name (e.g. `core`). It is published as
//! an archive named after it with one of the allowed extensions, and may carry
//! a `metadata.json` entry declaring other packages it depends on.
//!
//! # Overview
//!
//! - **Naming**: extension allow-list, trial order, resource names
//! - **ArchiveEntry**: a named file decoded from an archive
//! - **Metadata**: the optional `metadata.json` record and its dependencies
//!
//! # Metadata Format
//!
//! ```json
//! {
//!     "name": "app",
//!     "dependencies": {
//!         "core": "1.0",
//!         "utils": "latest"
//!     }
//! }
//! ```
//!
//! Only `dependencies` is interpreted. Version labels are carried for
//! reporting and never compared.

mod entry;
mod metadata;
mod naming;

pub use entry::ArchiveEntry;
pub use metadata::{Dependency, Metadata, MetadataLookup, MetadataReader, METADATA_ENTRY};
pub use naming::{allowed_file, resource_name, ArchiveFormat, ARCHIVE_TRIAL_ORDER};
