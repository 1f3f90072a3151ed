//! Error types for the `modproxy` CLI.

use modproxy::{ArchiveError, ConfigError, ErrorKind, EscapeError, ProxyError};
use thiserror::Error;

/// Exit status for a successful run.
pub const EXIT_OK: i32 = 0;
/// Exit status for general failures.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status when the proxy does not have the requested module or version.
pub const EXIT_NOT_FOUND: i32 = 2;
/// Exit status for malformed input (`EX_USAGE`).
pub const EXIT_INVALID_INPUT: i32 = 64;

/// Errors that can occur while running a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The proxy request failed.
    #[error(transparent)]
    Proxy(#[from] ProxyError),

    /// An archive entry could not be read.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// A path or version could not be escaped or unescaped.
    #[error(transparent)]
    Escape(#[from] EscapeError),

    /// JSON output could not be produced.
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing to standard output failed.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(source: std::io::Error) -> Self {
        Self::WriteFailed { source }
    }
}

impl CliError {
    /// Process exit status for this error.
    ///
    /// Missing modules and versions map to [`EXIT_NOT_FOUND`], malformed
    /// paths, versions and proxy URLs to [`EXIT_INVALID_INPUT`], and
    /// everything else to [`EXIT_FAILURE`].
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Proxy(error) if error.is_not_found() => EXIT_NOT_FOUND,
            Self::Proxy(error) if matches!(error.kind(), ErrorKind::InvalidInput) => {
                EXIT_INVALID_INPUT
            }
            Self::Archive(ArchiveError::MissingEntry { .. }) => EXIT_NOT_FOUND,
            Self::Escape(_) => EXIT_INVALID_INPUT,
            _ => EXIT_FAILURE,
        }
    }
}

/// Convenience alias for CLI results.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn status(code: u16, text: &str) -> ProxyError {
        ProxyError::Status {
            url: "http://proxy.test/a/@v/v1.info".to_owned(),
            status: code,
            status_text: text.to_owned(),
        }
    }

    #[rstest]
    #[case(status(404, "404 Not Found"), EXIT_NOT_FOUND)]
    #[case(status(410, "410 Gone"), EXIT_NOT_FOUND)]
    #[case(status(500, "500 Internal Server Error"), EXIT_FAILURE)]
    #[case(
        ProxyError::InvalidInput(EscapeError::AlreadyEscaped { input: "!a".to_owned() }),
        EXIT_INVALID_INPUT
    )]
    #[case(
        ProxyError::InvalidBaseUrl { url: "x".to_owned(), reason: "no scheme".to_owned() },
        EXIT_INVALID_INPUT
    )]
    fn proxy_errors_map_to_exit_codes(#[case] error: ProxyError, #[case] expected: i32) {
        assert_eq!(CliError::from(error).exit_code(), expected);
    }

    #[rstest]
    fn missing_entry_is_not_found() {
        let error = CliError::from(ArchiveError::MissingEntry {
            name: "go.mod".to_owned(),
        });
        assert_eq!(error.exit_code(), EXIT_NOT_FOUND);
    }

    #[rstest]
    fn escape_errors_are_invalid_input() {
        let error = CliError::from(EscapeError::DanglingMarker {
            input: "a!".to_owned(),
        });
        assert_eq!(error.exit_code(), EXIT_INVALID_INPUT);
    }

    #[rstest]
    fn write_failures_are_general_failures() {
        let error = CliError::from(std::io::Error::other("closed"));
        assert_eq!(error.exit_code(), EXIT_FAILURE);
        assert_eq!(error.to_string(), "failed to write output");
    }

    #[rstest]
    fn proxy_messages_pass_through_unchanged() {
        let error = CliError::from(status(404, "404 Not Found"));
        assert_eq!(
            error.to_string(),
            "http.Get(\"http://proxy.test/a/@v/v1.info\") returned response: 404 (\"404 Not Found\")"
        );
    }
}
