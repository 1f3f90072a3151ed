//! Case-safe escaping of module paths and versions.
//!
//! Module paths are case-sensitive, but the proxy may store them on
//! case-insensitive file systems. Every ASCII uppercase letter is therefore
//! written as the escape marker followed by its lowercase form
//! (`Azure` becomes `!azure`). The mapping is injective: raw input that
//! already contains the marker is rejected rather than passed through.

use thiserror::Error;

/// Character that introduces an escaped uppercase letter.
pub const ESCAPE_MARKER: char = '!';

/// Errors arising from escaping or unescaping an identity component.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum EscapeError {
    /// The raw input already contains the escape marker.
    #[error("invalid input: path already escaped: {input:?}")]
    AlreadyEscaped {
        /// The rejected raw input.
        input: String,
    },

    /// The escaped input ends with a lone escape marker.
    #[error("invalid escaped string {input:?}: trailing escape marker")]
    DanglingMarker {
        /// The rejected escaped input.
        input: String,
    },

    /// The escape marker is followed by something other than a lowercase letter.
    #[error("invalid escaped string {input:?}: escape marker followed by {found:?}")]
    InvalidEscape {
        /// The rejected escaped input.
        input: String,
        /// The character found after the marker.
        found: char,
    },

    /// The escaped input contains a bare uppercase letter.
    #[error("invalid escaped string {input:?}: unescaped uppercase letter {found:?}")]
    UnescapedUppercase {
        /// The rejected escaped input.
        input: String,
        /// The offending uppercase letter.
        found: char,
    },
}

/// Escapes a raw module path or version for use in proxy URLs.
///
/// # Errors
///
/// Returns [`EscapeError::AlreadyEscaped`] if `raw` contains
/// [`ESCAPE_MARKER`].
///
/// # Examples
///
/// ```
/// use modproxy_client::identity::encode;
///
/// assert_eq!(encode("github.com/Azure/go-autorest").unwrap(), "github.com/!azure/go-autorest");
/// assert!(encode("github.com/!azure/go-autorest").is_err());
/// ```
pub fn encode(raw: &str) -> Result<String, EscapeError> {
    if raw.contains(ESCAPE_MARKER) {
        return Err(EscapeError::AlreadyEscaped {
            input: raw.to_owned(),
        });
    }

    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_uppercase() {
            escaped.push(ESCAPE_MARKER);
            escaped.push(ch.to_ascii_lowercase());
        } else {
            escaped.push(ch);
        }
    }
    Ok(escaped)
}

/// Reverses [`encode`], accepting only strings `encode` could produce.
///
/// # Errors
///
/// Returns an [`EscapeError`] when the marker dangles, is followed by
/// anything but an ASCII lowercase letter, or when a bare ASCII uppercase
/// letter appears.
pub fn decode(escaped: &str) -> Result<String, EscapeError> {
    let mut raw = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();

    while let Some(ch) = chars.next() {
        if ch == ESCAPE_MARKER {
            match chars.next() {
                Some(next) if next.is_ascii_lowercase() => raw.push(next.to_ascii_uppercase()),
                Some(found) => {
                    return Err(EscapeError::InvalidEscape {
                        input: escaped.to_owned(),
                        found,
                    });
                }
                None => {
                    return Err(EscapeError::DanglingMarker {
                        input: escaped.to_owned(),
                    });
                }
            }
        } else if ch.is_ascii_uppercase() {
            return Err(EscapeError::UnescapedUppercase {
                input: escaped.to_owned(),
                found: ch,
            });
        } else {
            raw.push(ch);
        }
    }

    Ok(raw)
}

/// Escapes a module path and version independently.
///
/// The path is checked first, so a path error wins over a version error.
///
/// # Errors
///
/// Returns [`EscapeError::AlreadyEscaped`] if either component contains
/// [`ESCAPE_MARKER`].
pub fn encode_path_and_version(path: &str, version: &str) -> Result<(String, String), EscapeError> {
    Ok((encode(path)?, encode(version)?))
}

/// A module path and version alongside their escaped forms.
///
/// Built once per request and never mutated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModuleIdentity {
    raw_path: String,
    raw_version: String,
    encoded_path: String,
    encoded_version: String,
}

impl ModuleIdentity {
    /// Escapes `path` and `version` into a new identity.
    ///
    /// # Errors
    ///
    /// Returns [`EscapeError::AlreadyEscaped`] if either component contains
    /// [`ESCAPE_MARKER`].
    ///
    /// # Examples
    ///
    /// ```
    /// use modproxy_client::identity::ModuleIdentity;
    ///
    /// let identity = ModuleIdentity::new("github.com/BurntSushi/toml", "v0.3.1").unwrap();
    /// assert_eq!(identity.encoded_path(), "github.com/!burnt!sushi/toml");
    /// assert_eq!(identity.raw_path(), "github.com/BurntSushi/toml");
    /// ```
    pub fn new(path: &str, version: &str) -> Result<Self, EscapeError> {
        let (encoded_path, encoded_version) = encode_path_and_version(path, version)?;
        Ok(Self {
            raw_path: path.to_owned(),
            raw_version: version.to_owned(),
            encoded_path,
            encoded_version,
        })
    }

    /// The module path as supplied by the caller.
    #[must_use]
    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    /// The version as supplied by the caller.
    #[must_use]
    pub fn raw_version(&self) -> &str {
        &self.raw_version
    }

    /// The escaped module path.
    #[must_use]
    pub fn encoded_path(&self) -> &str {
        &self.encoded_path
    }

    /// The escaped version.
    #[must_use]
    pub fn encoded_version(&self) -> &str {
        &self.encoded_version
    }

    /// The `{path}@{version}/` prefix carried by every archive entry name.
    #[must_use]
    pub fn archive_root(&self) -> String {
        format!("{}@{}/", self.raw_path, self.raw_version)
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
