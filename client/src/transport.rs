//! Blocking HTTP transport for proxy requests.
//!
//! [`HttpGet`] is the seam between the resolvers and the network so tests can
//! substitute any compliant server or a mock. [`fetch`] performs exactly one
//! GET and classifies the outcome: a 200 response yields its body, any other
//! status becomes [`ProxyError::Status`], and failures below HTTP become
//! [`ProxyError::Transport`]. Nothing is retried.

use std::fmt;
use std::io::Read;
use std::time::{Duration, Instant};

use log::{debug, trace};
use ureq::http::StatusCode;

use crate::error::{ProxyError, Result, TransportKind};

/// Default timeout applied to every request by [`UreqTransport::default`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A response whose status has not yet been checked.
pub struct RawResponse {
    /// The numeric HTTP status.
    pub status: u16,
    /// The status line text, for example `404 Not Found`.
    pub status_text: String,
    /// The unread response body.
    pub body: Box<dyn Read>,
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .finish_non_exhaustive()
    }
}

/// A failure that prevented any HTTP status from being received.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransportFailure {
    /// Failure classification.
    pub kind: TransportKind,
    /// A human-readable description of the failure.
    pub reason: String,
}

impl TransportFailure {
    fn deadline_elapsed() -> Self {
        Self {
            kind: TransportKind::Timeout,
            reason: "deadline elapsed before the request was sent".to_owned(),
        }
    }
}

/// Anything that can issue a single blocking HTTP GET.
///
/// Implementations must not retry and must not interpret the status code.
#[cfg_attr(test, mockall::automock)]
pub trait HttpGet {
    /// Issues a GET for `url`, aborting once `deadline` passes.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportFailure`] when no response status was received.
    fn get(
        &self,
        url: &str,
        deadline: Option<Instant>,
    ) -> std::result::Result<RawResponse, TransportFailure>;
}

/// Issues one GET through `transport` and returns the body of a 200 response.
///
/// The caller owns the returned body; dropping it releases the connection.
///
/// # Errors
///
/// Returns [`ProxyError::Transport`] when the request fails below HTTP and
/// [`ProxyError::Status`] for any status other than 200.
pub fn fetch<T>(transport: &T, url: &str, deadline: Option<Instant>) -> Result<Box<dyn Read>>
where
    T: HttpGet + ?Sized,
{
    debug!("GET {url}");
    let response = transport
        .get(url, deadline)
        .map_err(|failure| ProxyError::Transport {
            url: url.to_owned(),
            kind: failure.kind,
            reason: failure.reason,
        })?;
    trace!("GET {url}: {}", response.status_text);

    if response.status != 200 {
        return Err(ProxyError::Status {
            url: url.to_owned(),
            status: response.status,
            status_text: response.status_text,
        });
    }
    Ok(response.body)
}

/// Renders a status line such as `404 Not Found`.
#[must_use]
pub fn status_text(status: StatusCode) -> String {
    status.canonical_reason().map_or_else(
        || status.as_str().to_owned(),
        |reason| format!("{} {reason}", status.as_str()),
    )
}

/// Production transport backed by a shared `ureq` agent.
///
/// The agent's connection pool is safe to share, so one transport may serve
/// concurrent callers.
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Option<Duration>,
}

impl UreqTransport {
    /// Creates a transport whose requests time out after `timeout`
    /// (`None` disables the global timeout).
    #[must_use]
    pub fn new(timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            timeout,
        }
    }

    /// The configured global timeout.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The timeout for a request that must finish by `deadline`.
    fn effective_timeout(
        &self,
        deadline: Instant,
    ) -> std::result::Result<Duration, TransportFailure> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(TransportFailure::deadline_elapsed());
        }
        Ok(self
            .timeout
            .map_or(remaining, |configured| configured.min(remaining)))
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Some(DEFAULT_TIMEOUT))
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpGet for UreqTransport {
    fn get(
        &self,
        url: &str,
        deadline: Option<Instant>,
    ) -> std::result::Result<RawResponse, TransportFailure> {
        let request = self.agent.get(url);
        let outcome = match deadline {
            Some(deadline) => {
                let timeout = self.effective_timeout(deadline)?;
                request.config().timeout_global(Some(timeout)).build().call()
            }
            None => request.call(),
        };
        let response = outcome.map_err(|e| classify_ureq_error(&e))?;

        let status = response.status();
        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status_text(status),
            body: Box::new(response.into_body().into_reader()),
        })
    }
}

/// Map a ureq error to a [`TransportFailure`].
fn classify_ureq_error(err: &ureq::Error) -> TransportFailure {
    let kind = match err {
        ureq::Error::Timeout(_) => TransportKind::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => TransportKind::Connect,
        ureq::Error::Io(io) => match io.kind() {
            std::io::ErrorKind::TimedOut => TransportKind::Timeout,
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::NotConnected
            | std::io::ErrorKind::AddrNotAvailable => TransportKind::Connect,
            _ => TransportKind::Other,
        },
        _ => TransportKind::Other,
    };
    TransportFailure {
        kind,
        reason: err.to_string(),
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
