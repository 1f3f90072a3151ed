//! In-memory module archives served by the `.zip` resource.
//!
//! The archive is buffered in full and its central directory read once. Entry
//! names are kept exactly as the proxy served them, including the
//! `{path}@{version}/` prefix; nothing is filtered or re-rooted.

use std::fmt;
use std::io::{Cursor, Read};

use log::trace;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{ProxyError, Result};

/// Default cap on the size of a buffered archive (500 MiB).
pub const DEFAULT_MAX_ARCHIVE_BYTES: u64 = 500 << 20;

/// Errors arising from reading entries of an opened archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// No entry has the requested name.
    #[error("archive has no entry named {name:?}")]
    MissingEntry {
        /// The requested entry name.
        name: String,
    },

    /// The entry exists but its contents could not be read.
    #[error("failed to read archive entry {name:?}: {reason}")]
    Read {
        /// The requested entry name.
        name: String,
        /// Description of the failure.
        reason: String,
    },

    /// The entry is not valid UTF-8 text.
    #[error("archive entry {name:?} is not valid UTF-8")]
    NotUtf8 {
        /// The requested entry name.
        name: String,
    },
}

/// Directory record for one archive entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArchiveEntry {
    /// Slash-separated entry name.
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Compressed size in bytes.
    pub compressed_size: u64,
    /// True for directory records.
    pub is_dir: bool,
}

/// An opened module archive.
pub struct ArchiveHandle {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    entries: Vec<ArchiveEntry>,
    byte_len: usize,
}

impl ArchiveHandle {
    /// Opens an archive from its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns the reader's [`ZipError`] when the bytes are not a zip archive.
    pub fn from_bytes(bytes: Vec<u8>) -> std::result::Result<Self, ZipError> {
        let byte_len = bytes.len();
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let file = archive.by_index_raw(index)?;
            entries.push(ArchiveEntry {
                name: file.name().to_owned(),
                size: file.size(),
                compressed_size: file.compressed_size(),
                is_dir: file.is_dir(),
            });
        }
        Ok(Self {
            archive,
            entries,
            byte_len,
        })
    }

    /// Entries in archive order.
    #[must_use]
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Entry names in archive order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the archive has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the directory record for `name`.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// True when an entry is named exactly `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Reads the full contents of the entry `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::MissingEntry`] for unknown names and
    /// [`ArchiveError::Read`] when decompression fails.
    pub fn read(&mut self, name: &str) -> std::result::Result<Vec<u8>, ArchiveError> {
        let mut file = self.archive.by_name(name).map_err(|e| match e {
            ZipError::FileNotFound => ArchiveError::MissingEntry {
                name: name.to_owned(),
            },
            other => ArchiveError::Read {
                name: name.to_owned(),
                reason: other.to_string(),
            },
        })?;

        let mut contents = Vec::with_capacity(capacity_hint(file.size(), self.byte_len));
        file.read_to_end(&mut contents)
            .map_err(|e| ArchiveError::Read {
                name: name.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(contents)
    }

    /// Reads the entry `name` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::read`], or [`ArchiveError::NotUtf8`].
    pub fn read_to_string(&mut self, name: &str) -> std::result::Result<String, ArchiveError> {
        let bytes = self.read(name)?;
        String::from_utf8(bytes).map_err(|_| ArchiveError::NotUtf8 {
            name: name.to_owned(),
        })
    }
}

/// Initial buffer size for an entry declaring `declared` bytes.
///
/// The declared size comes from the proxy, so it is capped at the size of the
/// whole archive; `read_to_end` grows the buffer past the hint if needed.
pub(crate) fn capacity_hint(declared: u64, archive_len: usize) -> usize {
    usize::try_from(declared).map_or(archive_len, |size| size.min(archive_len))
}

impl fmt::Debug for ArchiveHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveHandle")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

/// Buffers a response body, failing once it grows past `limit` bytes.
pub(crate) fn read_bounded<R: Read>(url: &str, body: R, limit: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    body.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| ProxyError::body_io(url, &e))?;

    if bytes.len() as u64 > limit {
        return Err(ProxyError::ArchiveTooLarge {
            url: url.to_owned(),
            limit,
        });
    }
    Ok(bytes)
}

/// Buffers and opens an archive body fetched from `url`.
///
/// # Errors
///
/// Returns [`ProxyError::ArchiveTooLarge`] past `limit`,
/// [`ProxyError::CorruptArchive`] for unreadable archives, and
/// [`ProxyError::Transport`] when reading the body fails.
pub fn open_archive<R: Read>(url: &str, body: R, limit: u64) -> Result<ArchiveHandle> {
    let bytes = read_bounded(url, body, limit)?;
    trace!("{url}: {} archive bytes", bytes.len());
    ArchiveHandle::from_bytes(bytes).map_err(|e| ProxyError::CorruptArchive {
        url: url.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
