//! Module proxy client with configuration loading.
//!
//! Re-exports the protocol client from [`modproxy_client`] and adds
//! [`ProxyConfig`], which turns a `modproxy.toml` file into a ready client.

pub mod config;

pub use config::{ConfigError, DEFAULT_PROXY_URL, PROXY_URL_ENV, ProxyConfig};
pub use modproxy_client::{
    ArchiveEntry, ArchiveError, ArchiveHandle, ClientOptions, ErrorKind, EscapeError,
    ModuleIdentity, ProxyClient, ProxyError, ResourceKind, TransportKind, VersionInfo, archive,
    endpoint, identity,
};
