//! Client configuration loaded from `modproxy.toml`.
//!
//! `ProxyConfig` captures the settings needed to build a
//! [`ProxyClient`]: which proxy to talk to, how long a request may take, and
//! how large an archive may grow. Values are deserialised from TOML when a
//! file is present and fall back to defaults otherwise.

use std::path::Path;
use std::time::Duration;

use log::debug;
use modproxy_client::archive::DEFAULT_MAX_ARCHIVE_BYTES;
use modproxy_client::{ClientOptions, ProxyClient, ProxyError};
use serde::Deserialize;
use thiserror::Error;

/// Proxy used when no other is configured.
pub const DEFAULT_PROXY_URL: &str = "https://proxy.golang.org";

/// Environment variable overriding the configured proxy URL.
pub const PROXY_URL_ENV: &str = "MODPROXY_URL";

/// Errors arising from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}")]
    Read {
        /// Path of the file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for building a module proxy client.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyConfig {
    /// Base URL of the module proxy.
    ///
    /// Blank values fall back to [`DEFAULT_PROXY_URL`] so templated files
    /// with an empty `proxy_url = ""` still produce a usable client.
    pub proxy_url: String,
    /// Per-request timeout in seconds; `0` disables the timeout.
    pub timeout_secs: u64,
    /// Largest archive, in bytes, the client will buffer.
    pub max_archive_bytes: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            proxy_url: DEFAULT_PROXY_URL.to_owned(),
            timeout_secs: Self::default_timeout_secs(),
            max_archive_bytes: DEFAULT_MAX_ARCHIVE_BYTES,
        }
    }
}

impl ProxyConfig {
    const fn default_timeout_secs() -> u64 {
        30
    }

    /// Parses configuration from TOML source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, wrongly typed
    /// values, or unknown fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use modproxy::ProxyConfig;
    ///
    /// let config = ProxyConfig::from_toml_str("timeout_secs = 5\n").unwrap();
    /// assert_eq!(config.timeout_secs, 5);
    /// assert_eq!(config.proxy_url(), "https://proxy.golang.org");
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is invalid.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        debug!("loading configuration from {}", path.display());
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Loads configuration using the supplied loader.
    ///
    /// This exists so callers and tests can inject configuration without
    /// touching the file system.
    ///
    /// # Examples
    ///
    /// ```
    /// use modproxy::ProxyConfig;
    ///
    /// let config = ProxyConfig::load_with(|| Ok(ProxyConfig::default())).unwrap();
    /// assert_eq!(config.timeout_secs, 30);
    /// ```
    ///
    /// # Errors
    ///
    /// Propagates the loader's error.
    pub fn load_with<F>(loader: F) -> Result<Self, ConfigError>
    where
        F: FnOnce() -> Result<Self, ConfigError>,
    {
        loader()
    }

    /// The proxy URL, treating blank values as unset.
    #[must_use]
    pub fn proxy_url(&self) -> &str {
        let trimmed = self.proxy_url.trim();
        if trimmed.is_empty() {
            DEFAULT_PROXY_URL
        } else {
            trimmed
        }
    }

    /// Replaces the proxy URL when `url` is present and not blank.
    #[must_use]
    pub fn with_proxy_url(mut self, url: Option<&str>) -> Self {
        if let Some(value) = url.map(str::trim).filter(|value| !value.is_empty()) {
            value.clone_into(&mut self.proxy_url);
        }
        self
    }

    /// Replaces the timeout when `timeout_secs` is present.
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: Option<u64>) -> Self {
        if let Some(value) = timeout_secs {
            self.timeout_secs = value;
        }
        self
    }

    /// The request timeout, or `None` when disabled.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }

    /// Client options derived from this configuration.
    #[must_use]
    pub const fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: self.timeout(),
            max_archive_bytes: self.max_archive_bytes,
        }
    }

    /// Builds a client for the configured proxy.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::InvalidBaseUrl`] if the proxy URL is unusable.
    pub fn build_client(&self) -> Result<ProxyClient, ProxyError> {
        ProxyClient::with_options(self.proxy_url(), self.client_options())
    }
}
