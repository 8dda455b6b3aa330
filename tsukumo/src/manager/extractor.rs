//! Tar archive codec for package installation and bundling.
//!
//! This module handles:
//! - Decoding `.tar` and `.tar.gz` archives into in-memory entries
//! - Encoding entries into either format
//!
//! Gzip input is detected from its magic bytes rather than the file
//! extension, so a mislabelled archive still decodes.

use std::io::{Cursor, Read};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{Archive, Builder, EntryType, Header};
use tracing::debug;

use super::error::{ManagerError, ManagerResult};
use super::traits::ArchiveCodec;
use crate::package::{ArchiveEntry, ArchiveFormat};

/// Leading bytes of every gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// File mode applied to encoded entries.
const ENTRY_MODE: u32 = 0o644;

/// Archive codec backed by the `tar` and `flate2` crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct TarCodec;

impl TarCodec {
    /// Create a new tar codec.
    pub fn new() -> Self {
        Self
    }

    /// Whether the bytes start with the gzip magic number.
    pub fn is_gzip(bytes: &[u8]) -> bool {
        bytes.starts_with(&GZIP_MAGIC)
    }

    fn corrupt(reason: impl ToString) -> ManagerError {
        ManagerError::ArchiveCorrupt {
            name: "archive".to_string(),
            reason: reason.to_string(),
        }
    }

    /// Read every regular file from a tar stream.
    fn read_entries<R: Read>(reader: R) -> ManagerResult<Vec<ArchiveEntry>> {
        let mut archive = Archive::new(reader);
        let mut entries = Vec::new();

        for entry in archive.entries().map_err(Self::corrupt)? {
            let mut entry = entry.map_err(Self::corrupt)?;
            let entry_type = entry.header().entry_type();
            let name = entry
                .path()
                .map_err(Self::corrupt)?
                .to_string_lossy()
                .into_owned();

            if !matches!(entry_type, EntryType::Regular | EntryType::Continuous) {
                debug!(entry = %name, ?entry_type, "Skipping non-file archive entry");
                continue;
            }

            let size = entry.size();
            let mut data = Vec::with_capacity(size as usize);
            entry.read_to_end(&mut data).map_err(Self::corrupt)?;
            if data.len() as u64 != size {
                return Err(Self::corrupt(format!(
                    "entry {} truncated: expected {} bytes, read {}",
                    name,
                    size,
                    data.len()
                )));
            }
            entries.push(ArchiveEntry { name, data });
        }

        Ok(entries)
    }

    /// Write entries into a tar stream and return the underlying writer.
    fn write_entries<W: std::io::Write>(writer: W, entries: &[ArchiveEntry]) -> ManagerResult<W> {
        let mut builder = Builder::new(writer);
        let mtime = chrono::Utc::now().timestamp().max(0) as u64;

        for entry in entries {
            let mut header = Header::new_gnu();
            header.set_size(entry.data.len() as u64);
            header.set_mode(ENTRY_MODE);
            header.set_mtime(mtime);
            header.set_entry_type(EntryType::Regular);
            builder
                .append_data(&mut header, &entry.name, entry.data.as_slice())
                .map_err(|e| {
                    ManagerError::ArchiveBuildFailed(format!("entry {}: {}", entry.name, e))
                })?;
        }

        builder
            .into_inner()
            .map_err(|e| ManagerError::ArchiveBuildFailed(e.to_string()))
    }
}

impl ArchiveCodec for TarCodec {
    fn decode(&self, bytes: &[u8]) -> ManagerResult<Vec<ArchiveEntry>> {
        if bytes.is_empty() {
            return Err(Self::corrupt("empty archive"));
        }

        if Self::is_gzip(bytes) {
            Self::read_entries(GzDecoder::new(Cursor::new(bytes)))
        } else {
            Self::read_entries(Cursor::new(bytes))
        }
    }

    fn encode(&self, entries: &[ArchiveEntry], format: ArchiveFormat) -> ManagerResult<Vec<u8>> {
        match format {
            ArchiveFormat::Tar => Self::write_entries(Vec::new(), entries),
            ArchiveFormat::TarGz => {
                let encoder = GzEncoder::new(Vec::new(), Compression::default());
                Self::write_entries(encoder, entries)?
                    .finish()
                    .map_err(|e| ManagerError::ArchiveBuildFailed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entries() -> Vec<ArchiveEntry> {
        vec![
            ArchiveEntry::new("zeta.txt", b"last letter".to_vec()),
            ArchiveEntry::new("metadata.json", br#"{"dependencies": {}}"#.to_vec()),
            ArchiveEntry::new("nested/dir/alpha.bin", vec![0u8, 1, 2, 255]),
            ArchiveEntry::new("empty", Vec::new()),
        ]
    }

    #[test]
    fn test_roundtrip_preserves_order_and_contents() {
        let codec = TarCodec::new();
        for format in [ArchiveFormat::Tar, ArchiveFormat::TarGz] {
            let bytes = codec.encode(&sample_entries(), format).unwrap();
            let decoded = codec.decode(&bytes).unwrap();
            assert_eq!(decoded, sample_entries(), "format {}", format);
        }
    }

    #[test]
    fn test_gzip_output_is_detected() {
        let codec = TarCodec::new();
        let gz = codec
            .encode(&sample_entries(), ArchiveFormat::TarGz)
            .unwrap();
        let plain = codec.encode(&sample_entries(), ArchiveFormat::Tar).unwrap();

        assert!(TarCodec::is_gzip(&gz));
        assert!(!TarCodec::is_gzip(&plain));
    }

    #[test]
    fn test_long_entry_names_survive() {
        let codec = TarCodec::new();
        let long_name = format!("{}/file.txt", "deep".repeat(40));
        let entries = vec![ArchiveEntry::new(long_name.clone(), b"x".to_vec())];

        let bytes = codec.encode(&entries, ArchiveFormat::Tar).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded[0].name, long_name);
    }

    #[test]
    fn test_decode_empty_is_corrupt() {
        let result = TarCodec::new().decode(&[]);
        assert!(matches!(result, Err(ManagerError::ArchiveCorrupt { .. })));
    }

    #[test]
    fn test_decode_garbage_is_corrupt() {
        let result = TarCodec::new().decode(b"this is definitely not a tar archive");
        assert!(matches!(result, Err(ManagerError::ArchiveCorrupt { .. })));
    }

    #[test]
    fn test_decode_truncated_entry_is_corrupt() {
        let codec = TarCodec::new();
        let entries = vec![ArchiveEntry::new("big.bin", vec![7u8; 4096])];
        let bytes = codec.encode(&entries, ArchiveFormat::Tar).unwrap();

        // Header block plus part of the entry data
        let result = codec.decode(&bytes[..512 + 1000]);
        assert!(matches!(result, Err(ManagerError::ArchiveCorrupt { .. })));
    }

    #[test]
    fn test_decode_skips_directories() {
        let mut builder = Builder::new(Vec::new());

        let mut dir = Header::new_gnu();
        dir.set_entry_type(EntryType::Directory);
        dir.set_size(0);
        dir.set_mode(0o755);
        builder
            .append_data(&mut dir, "docs/", std::io::empty())
            .unwrap();

        let mut file = Header::new_gnu();
        file.set_size(5);
        file.set_mode(0o644);
        builder
            .append_data(&mut file, "docs/guide.md", &b"hello"[..])
            .unwrap();

        let bytes = builder.into_inner().unwrap();
        let decoded = TarCodec::new().decode(&bytes).unwrap();

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].name, "docs/guide.md");
        assert_eq!(decoded[0].data, b"hello");
    }
}
