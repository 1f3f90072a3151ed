//! Blocking client for the module proxy protocol.
//!
//! A module proxy serves, for every published (module path, version) pair,
//! version metadata at `{base}/{path}/@v/{version}.info` and the version's
//! files as a zip archive at `{base}/{path}/@v/{version}.zip`. This crate
//! escapes the identity, builds those URLs, performs the requests, and
//! decodes the responses into typed values or a [`ProxyError`].
//!
//! # Modules
//!
//! - [`identity`] - Case-safe escaping of module paths and versions
//! - [`endpoint`] - Resource URL construction and base URL normalisation
//! - [`transport`] - Blocking HTTP GET with status classification
//! - [`info`] - Version metadata decoding
//! - [`archive`] - Zip archive buffering and entry access
//! - [`client`] - The [`ProxyClient`] tying the pipeline together
//! - [`error`] - Error types and classification

pub mod archive;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod identity;
pub mod info;
pub mod transport;

pub use archive::{ArchiveEntry, ArchiveError, ArchiveHandle};
pub use client::{ClientOptions, ProxyClient};
pub use endpoint::ResourceKind;
pub use error::{ErrorKind, ProxyError, Result, TransportKind};
pub use identity::{EscapeError, ModuleIdentity};
pub use info::VersionInfo;
pub use transport::{HttpGet, RawResponse, TransportFailure, UreqTransport};
