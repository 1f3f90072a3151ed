//! Output formatting for the `modproxy` CLI.
//!
//! Each command renders either a tab-separated text form meant for people
//! and `cut`, or a JSON document via serde.

use modproxy::{ArchiveEntry, VersionInfo};
use serde::Serialize;

/// JSON form of an archive listing.
#[derive(Debug, Serialize)]
pub struct ArchiveListing<'a> {
    /// The archive URL.
    pub url: &'a str,
    /// Entries in archive order.
    pub entries: Vec<EntryRecord<'a>>,
}

/// JSON form of one archive entry.
#[derive(Debug, Serialize)]
pub struct EntryRecord<'a> {
    /// Full entry name, including the module root.
    pub name: &'a str,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// True for directory records.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_dir: bool,
}

impl<'a> ArchiveListing<'a> {
    /// Builds the listing for `entries` fetched from `url`.
    #[must_use]
    pub fn new(url: &'a str, entries: &'a [ArchiveEntry]) -> Self {
        Self {
            url,
            entries: entries
                .iter()
                .map(|entry| EntryRecord {
                    name: &entry.name,
                    size: entry.size,
                    is_dir: entry.is_dir,
                })
                .collect(),
        }
    }
}

/// Text form of version metadata: `{version}\t{time}`.
///
/// # Example
///
/// ```
/// use modproxy::VersionInfo;
/// use modproxy_cli::output::info_line;
///
/// let info: VersionInfo =
///     serde_json::from_str(r#"{"Version":"v1.0.0","Time":"2019-01-30T00:00:00Z"}"#).unwrap();
/// assert_eq!(info_line(&info), "v1.0.0\t2019-01-30T00:00:00Z");
/// ```
#[must_use]
pub fn info_line(info: &VersionInfo) -> String {
    format!(
        "{}\t{}",
        info.version,
        info.time.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
    )
}

/// Text form of an archive entry: `{size}\t{name}`.
#[must_use]
pub fn entry_line(entry: &ArchiveEntry) -> String {
    format!("{}\t{}", entry.size, entry.name)
}
