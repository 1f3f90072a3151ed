//! The module proxy client.
//!
//! [`ProxyClient`] resolves a raw (module path, version) pair into the
//! version's `.info` metadata or `.zip` archive. Each call escapes the
//! identity, builds the resource URL, performs one blocking GET, and decodes
//! the body. The client holds only immutable configuration, so a single
//! instance may be shared between threads.

use std::time::{Duration, Instant};

use crate::archive::{ArchiveHandle, DEFAULT_MAX_ARCHIVE_BYTES, open_archive};
use crate::endpoint::{Endpoint, ResourceKind};
use crate::error::Result;
use crate::identity::ModuleIdentity;
use crate::info::{VersionInfo, decode_info};
use crate::transport::{DEFAULT_TIMEOUT, HttpGet, UreqTransport, fetch};

/// Tunables for a [`ProxyClient`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Timeout applied to each request; `None` disables it.
    pub timeout: Option<Duration>,
    /// Largest archive body the client will buffer.
    pub max_archive_bytes: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            max_archive_bytes: DEFAULT_MAX_ARCHIVE_BYTES,
        }
    }
}

/// A client for one module proxy.
///
/// # Examples
///
/// ```no_run
/// use modproxy_client::ProxyClient;
///
/// let client = ProxyClient::new("https://proxy.golang.org")?;
/// let info = client.get_info("golang.org/x/text", "v0.3.0")?;
/// println!("{} published {}", info.version, info.time);
/// # Ok::<(), modproxy_client::ProxyError>(())
/// ```
#[derive(Debug)]
pub struct ProxyClient<T = UreqTransport> {
    endpoint: Endpoint,
    transport: T,
    max_archive_bytes: u64,
}

impl ProxyClient {
    /// Creates a client for `base_url` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ProxyError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute `http` or `https` URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Creates a client for `base_url` using `options`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ProxyError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute `http` or `https` URL.
    pub fn with_options(base_url: &str, options: ClientOptions) -> Result<Self> {
        Self::with_transport(base_url, UreqTransport::new(options.timeout), options)
    }
}

impl<T: HttpGet> ProxyClient<T> {
    /// Creates a client that sends requests through `transport`.
    ///
    /// `options.timeout` is not applied here; it belongs to the transport.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ProxyError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute `http` or `https` URL.
    pub fn with_transport(base_url: &str, transport: T, options: ClientOptions) -> Result<Self> {
        Ok(Self {
            endpoint: Endpoint::new(base_url)?,
            transport,
            max_archive_bytes: options.max_archive_bytes,
        })
    }

    /// The normalised proxy base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.endpoint.base()
    }

    /// The `.info` URL for `path` at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ProxyError::InvalidInput`] if either component is
    /// already escaped.
    pub fn info_url(&self, path: &str, version: &str) -> Result<String> {
        self.url(path, version, ResourceKind::Info)
    }

    /// The `.zip` URL for `path` at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ProxyError::InvalidInput`] if either component is
    /// already escaped.
    pub fn zip_url(&self, path: &str, version: &str) -> Result<String> {
        self.url(path, version, ResourceKind::Zip)
    }

    /// The URL of `kind` for an already escaped `identity`.
    #[must_use]
    pub fn url_for(&self, identity: &ModuleIdentity, kind: ResourceKind) -> String {
        self.endpoint.url_for(identity, kind)
    }

    /// Fetches the metadata for `path` at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ProxyError::InvalidInput`] for already-escaped input,
    /// [`crate::ProxyError::Status`] when the proxy does not serve the
    /// version (see [`crate::ProxyError::is_not_found`]),
    /// [`crate::ProxyError::Transport`] for network failures, and
    /// [`crate::ProxyError::MalformedInfo`] for undecodable metadata.
    pub fn get_info(&self, path: &str, version: &str) -> Result<VersionInfo> {
        self.resolve_info(path, version, None)
    }

    /// As [`Self::get_info`], aborting once `deadline` passes.
    ///
    /// # Errors
    ///
    /// As [`Self::get_info`]; an elapsed deadline is reported as a
    /// [`crate::ProxyError::Transport`] timeout.
    pub fn get_info_by(&self, path: &str, version: &str, deadline: Instant) -> Result<VersionInfo> {
        self.resolve_info(path, version, Some(deadline))
    }

    /// Fetches and opens the source archive for `path` at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ProxyError::InvalidInput`] for already-escaped input,
    /// [`crate::ProxyError::Status`] when the proxy does not serve the
    /// version, [`crate::ProxyError::Transport`] for network failures, and
    /// [`crate::ProxyError::CorruptArchive`] or
    /// [`crate::ProxyError::ArchiveTooLarge`] for unusable bodies.
    pub fn get_zip(&self, path: &str, version: &str) -> Result<ArchiveHandle> {
        self.resolve_zip(path, version, None)
    }

    /// As [`Self::get_zip`], aborting once `deadline` passes.
    ///
    /// # Errors
    ///
    /// As [`Self::get_zip`]; an elapsed deadline is reported as a
    /// [`crate::ProxyError::Transport`] timeout.
    pub fn get_zip_by(&self, path: &str, version: &str, deadline: Instant) -> Result<ArchiveHandle> {
        self.resolve_zip(path, version, Some(deadline))
    }

    /// Fetches and opens the source archive for an already escaped
    /// `identity`.
    ///
    /// # Errors
    ///
    /// As [`Self::get_zip`], except that escaping cannot fail.
    pub fn get_zip_for(&self, identity: &ModuleIdentity) -> Result<ArchiveHandle> {
        self.fetch_zip(identity, None)
    }

    fn url(&self, path: &str, version: &str, kind: ResourceKind) -> Result<String> {
        let identity = ModuleIdentity::new(path, version)?;
        Ok(self.endpoint.url_for(&identity, kind))
    }

    fn resolve_info(
        &self,
        path: &str,
        version: &str,
        deadline: Option<Instant>,
    ) -> Result<VersionInfo> {
        let url = self.url(path, version, ResourceKind::Info)?;
        let body = fetch(&self.transport, &url, deadline)?;
        decode_info(&url, body)
    }

    fn resolve_zip(
        &self,
        path: &str,
        version: &str,
        deadline: Option<Instant>,
    ) -> Result<ArchiveHandle> {
        let identity = ModuleIdentity::new(path, version)?;
        self.fetch_zip(&identity, deadline)
    }

    fn fetch_zip(
        &self,
        identity: &ModuleIdentity,
        deadline: Option<Instant>,
    ) -> Result<ArchiveHandle> {
        let url = self.url_for(identity, ResourceKind::Zip);
        let body = fetch(&self.transport, &url, deadline)?;
        open_archive(&url, body, self.max_archive_bytes)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
