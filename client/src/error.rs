//! Error types for module proxy requests.
//!
//! Every failure is returned to the caller as a [`ProxyError`]. Callers branch
//! on [`ProxyError::kind`] or [`ProxyError::is_not_found`] rather than on the
//! rendered message. The status variant renders in a fixed wire-compatible
//! format so existing tooling that matches on it keeps working.

use std::fmt;

use thiserror::Error;

use crate::identity::EscapeError;

/// Broad classification of a [`ProxyError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Malformed caller input; retrying cannot help.
    InvalidInput,
    /// The request never produced a response (connection, DNS, deadline).
    TransportFailure,
    /// The proxy answered with a status other than 200.
    ProtocolError,
    /// The response body could not be decoded.
    DecodeFailure,
}

/// Cause of a transport-level failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TransportKind {
    /// The per-call deadline or the configured timeout elapsed.
    Timeout,
    /// Name resolution or connection establishment failed.
    Connect,
    /// Any other I/O or protocol failure below HTTP status handling.
    Other,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Other => "transport",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while resolving module proxy resources.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The module path or version could not be escaped.
    #[error(transparent)]
    InvalidInput(#[from] EscapeError),

    /// The configured proxy base URL is unusable.
    #[error("invalid proxy base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// The rejected base URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request failed before an HTTP status was received.
    #[error("http.Get({url:?}) failed ({kind}): {reason}")]
    Transport {
        /// The URL that was requested.
        url: String,
        /// Failure classification.
        kind: TransportKind,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The proxy returned a non-200 response.
    ///
    /// `status_text` is rebuilt from the status code and its canonical
    /// reason phrase (`404 Not Found`), or the bare code when none exists.
    /// A custom reason phrase sent by the proxy is not preserved.
    #[error("http.Get({url:?}) returned response: {status} ({status_text:?})")]
    Status {
        /// The URL that was requested.
        url: String,
        /// The numeric HTTP status.
        status: u16,
        /// The code and canonical reason, for example `404 Not Found`.
        status_text: String,
    },

    /// The `.info` body was not valid version metadata.
    #[error("malformed version info from {url:?}: {reason}")]
    MalformedInfo {
        /// The URL that served the body.
        url: String,
        /// The JSON decoder's message.
        reason: String,
    },

    /// The `.zip` body was not a readable zip archive.
    #[error("corrupt archive from {url:?}: {reason}")]
    CorruptArchive {
        /// The URL that served the body.
        url: String,
        /// The archive reader's message.
        reason: String,
    },

    /// The `.zip` body exceeded the configured size limit.
    #[error("archive from {url:?} exceeds the {limit}-byte limit")]
    ArchiveTooLarge {
        /// The URL that served the body.
        url: String,
        /// The configured limit in bytes.
        limit: u64,
    },
}

impl ProxyError {
    /// Returns the broad classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) | Self::InvalidBaseUrl { .. } => ErrorKind::InvalidInput,
            Self::Transport { .. } => ErrorKind::TransportFailure,
            Self::Status { .. } => ErrorKind::ProtocolError,
            Self::MalformedInfo { .. }
            | Self::CorruptArchive { .. }
            | Self::ArchiveTooLarge { .. } => ErrorKind::DecodeFailure,
        }
    }

    /// Returns true when the proxy reported the module or version as
    /// unavailable (404 Not Found or 410 Gone).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404 | 410, .. })
    }

    /// Returns the HTTP status for protocol errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the request URL, when the error is tied to one.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::InvalidInput(_) => None,
            Self::InvalidBaseUrl { url, .. }
            | Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::MalformedInfo { url, .. }
            | Self::CorruptArchive { url, .. }
            | Self::ArchiveTooLarge { url, .. } => Some(url),
        }
    }

    /// Builds a [`ProxyError::Transport`] from an I/O failure while the
    /// response body was being read.
    pub(crate) fn body_io(url: &str, err: &std::io::Error) -> Self {
        let kind = if err.kind() == std::io::ErrorKind::TimedOut {
            TransportKind::Timeout
        } else {
            TransportKind::Other
        };
        Self::Transport {
            url: url.to_owned(),
            kind,
            reason: format!("reading response body: {err}"),
        }
    }
}

/// Result type alias using [`ProxyError`].
pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn status_error_matches_wire_format() {
        let err = ProxyError::Status {
            url: "http://proxy.test/my.mod/nonexistmodule/@v/v1.0.0.zip".to_owned(),
            status: 404,
            status_text: "404 Not Found".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "http.Get(\"http://proxy.test/my.mod/nonexistmodule/@v/v1.0.0.zip\") returned response: 404 (\"404 Not Found\")"
        );
    }

    #[rstest]
    #[case(404, true)]
    #[case(410, true)]
    #[case(500, false)]
    #[case(403, false)]
    fn not_found_covers_missing_statuses(#[case] status: u16, #[case] expected: bool) {
        let err = ProxyError::Status {
            url: "http://proxy.test/x".to_owned(),
            status,
            status_text: status.to_string(),
        };
        assert_eq!(err.is_not_found(), expected);
        assert_eq!(err.status(), Some(status));
        assert_eq!(err.kind(), ErrorKind::ProtocolError);
    }

    #[test]
    fn escape_error_is_invalid_input_and_displays_transparently() {
        let source = EscapeError::AlreadyEscaped {
            input: "github.com/!azure".to_owned(),
        };
        let message = source.to_string();
        let err = ProxyError::from(source);
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.to_string(), message);
        assert!(err.url().is_none());
        assert!(!err.is_not_found());
    }

    #[test]
    fn transport_error_mentions_url_and_reason() {
        let err = ProxyError::Transport {
            url: "http://proxy.test/a".to_owned(),
            kind: TransportKind::Connect,
            reason: "connection refused".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("http://proxy.test/a"));
        assert!(msg.contains("connection refused"));
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert_eq!(err.url(), Some("http://proxy.test/a"));
    }

    #[test]
    fn body_io_timeout_is_classified_as_timeout() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        let err = ProxyError::body_io("http://proxy.test/a", &io);
        assert!(matches!(
            err,
            ProxyError::Transport {
                kind: TransportKind::Timeout,
                ..
            }
        ));
    }

    #[rstest]
    #[case(ProxyError::MalformedInfo { url: "u".to_owned(), reason: "r".to_owned() })]
    #[case(ProxyError::CorruptArchive { url: "u".to_owned(), reason: "r".to_owned() })]
    #[case(ProxyError::ArchiveTooLarge { url: "u".to_owned(), limit: 1 })]
    fn decode_variants_share_a_kind(#[case] err: ProxyError) {
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
        assert_eq!(err.url(), Some("u"));
    }
}
