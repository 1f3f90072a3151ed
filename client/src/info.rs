//! Version metadata served by the `.info` resource.

use std::io::Read;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProxyError, Result};

/// Metadata for a single module version.
///
/// Fields beyond `Version` and `Time` are ignored.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct VersionInfo {
    /// The canonical version string.
    #[serde(rename = "Version")]
    pub version: String,
    /// The commit time recorded by the proxy.
    #[serde(rename = "Time")]
    pub time: DateTime<Utc>,
}

/// Decodes an `.info` body fetched from `url`.
///
/// # Errors
///
/// Returns [`ProxyError::MalformedInfo`] when the body is not a JSON object
/// with a string `Version` and an RFC 3339 `Time`, or
/// [`ProxyError::Transport`] when reading the body fails.
pub fn decode_info<R: Read>(url: &str, body: R) -> Result<VersionInfo> {
    serde_json::from_reader(body).map_err(|e| {
        if e.is_io() {
            let io = std::io::Error::from(e);
            ProxyError::body_io(url, &io)
        } else {
            ProxyError::MalformedInfo {
                url: url.to_owned(),
                reason: e.to_string(),
            }
        }
    })
}
