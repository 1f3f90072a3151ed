//! Proxy resource URL construction.
//!
//! Each module version exposes its resources under
//! `{base}/{escaped path}/@v/{escaped version}.{ext}`.

use ureq::http::Uri;

use crate::error::{ProxyError, Result};
use crate::identity::ModuleIdentity;

/// The per-version resources a proxy serves.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    /// Version metadata (`.info`).
    Info,
    /// Source archive (`.zip`).
    Zip,
}

impl ResourceKind {
    /// File extension used by the proxy for this resource.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Zip => "zip",
        }
    }
}

/// Strips every trailing `/` from a base URL.
///
/// # Examples
///
/// ```
/// use modproxy_client::endpoint::normalize_base;
///
/// assert_eq!(normalize_base("http://host.com///"), "http://host.com");
/// assert_eq!(normalize_base("http://localhost:7000/index"), "http://localhost:7000/index");
/// ```
#[must_use]
pub fn normalize_base(base: &str) -> &str {
    base.trim_end_matches('/')
}

/// Builds the URL of `kind` for an already escaped path and version.
#[must_use]
pub fn build_url(
    base: &str,
    encoded_path: &str,
    encoded_version: &str,
    kind: ResourceKind,
) -> String {
    format!(
        "{}/{encoded_path}/@v/{encoded_version}.{}",
        normalize_base(base),
        kind.extension()
    )
}

/// A validated, normalised proxy base URL.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoint {
    base: String,
}

impl Endpoint {
    /// Validates and normalises `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::InvalidBaseUrl`] unless `base` is an absolute
    /// `http` or `https` URL with a host.
    pub fn new(base: &str) -> Result<Self> {
        let normalised = normalize_base(base.trim());
        let invalid = |reason: &str| ProxyError::InvalidBaseUrl {
            url: base.to_owned(),
            reason: reason.to_owned(),
        };

        let uri = normalised
            .parse::<Uri>()
            .map_err(|e| invalid(&e.to_string()))?;
        match uri.scheme_str() {
            Some("http" | "https") => {}
            Some(_) => return Err(invalid("scheme must be http or https")),
            None => return Err(invalid("missing scheme")),
        }
        if uri.host().is_none_or(str::is_empty) {
            return Err(invalid("missing host"));
        }
        if uri.query().is_some() {
            return Err(invalid("query strings are not supported"));
        }

        Ok(Self {
            base: normalised.to_owned(),
        })
    }

    /// The normalised base URL.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The URL of `kind` for `identity`.
    #[must_use]
    pub fn url_for(&self, identity: &ModuleIdentity, kind: ResourceKind) -> String {
        build_url(
            &self.base,
            identity.encoded_path(),
            identity.encoded_version(),
            kind,
        )
    }
}
