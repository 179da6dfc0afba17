//! Problem taxonomy and the classifier that maps a failed HTTP exchange to it.

use serde::{Deserialize, Serialize};

/// Why an API call did not produce a usable result.
#[derive(thiserror::Error, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Problem {
    /// The request timed out before a response arrived.
    #[error("request timed out")]
    Timeout,
    /// No connection to the server could be made.
    #[error("cannot connect to the server")]
    CannotConnect,
    /// The server answered with a 5xx status.
    #[error("server error")]
    Server,
    /// 401.
    #[error("unauthorized")]
    Unauthorized,
    /// 403.
    #[error("forbidden")]
    Forbidden,
    /// 404.
    #[error("not found")]
    NotFound,
    /// Any other 4xx.
    #[error("request rejected")]
    Rejected,
    /// A failure that fits no other kind.
    #[error("unknown error")]
    Unknown,
    /// The server answered 2xx but the body did not have the expected shape.
    #[error("unexpected response data")]
    BadData,
}

impl Problem {
    /// The wire name of this problem, e.g. `"cannot-connect"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Problem::Timeout => "timeout",
            Problem::CannotConnect => "cannot-connect",
            Problem::Server => "server",
            Problem::Unauthorized => "unauthorized",
            Problem::Forbidden => "forbidden",
            Problem::NotFound => "not-found",
            Problem::Rejected => "rejected",
            Problem::Unknown => "unknown",
            Problem::BadData => "bad-data",
        }
    }

    /// Whether retrying the same call later might succeed.
    pub fn is_temporary(&self) -> bool {
        matches!(self, Problem::Timeout | Problem::CannotConnect | Problem::Unknown)
    }
}

/// Transport-level failure reported when no status code was received.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Connect,
    Other,
}

/// What is known about an HTTP exchange once it has finished or failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct HttpOutcome {
    pub status: Option<u16>,
    pub transport: Option<TransportFailure>,
}

impl HttpOutcome {
    /// A response was received with the given status.
    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            transport: None,
        }
    }

    /// No response was received.
    pub fn transport(failure: TransportFailure) -> Self {
        Self {
            status: None,
            transport: Some(failure),
        }
    }

    /// Describes a failed `reqwest` call.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::status(status.as_u16());
        }
        let failure = if err.is_timeout() {
            TransportFailure::Timeout
        } else if err.is_connect() {
            TransportFailure::Connect
        } else {
            TransportFailure::Other
        };
        Self::transport(failure)
    }
}

/// Maps an HTTP exchange to a [`Problem`], or `None` when the exchange
/// actually succeeded (2xx).
///
/// Rules, first match wins: no status is a network failure (timeout or
/// cannot-connect); 2xx is no problem; 4xx refines to 401/403/404 or
/// rejected; 5xx and above is a server error; anything else is unknown.
pub fn classify(outcome: &HttpOutcome) -> Option<Problem> {
    let status = match outcome.status {
        None => {
            return Some(match outcome.transport {
                Some(TransportFailure::Timeout) => Problem::Timeout,
                _ => Problem::CannotConnect,
            })
        }
        Some(status) => status,
    };

    match status {
        200..=299 => None,
        401 => Some(Problem::Unauthorized),
        403 => Some(Problem::Forbidden),
        404 => Some(Problem::NotFound),
        400..=499 => Some(Problem::Rejected),
        500..=u16::MAX => Some(Problem::Server),
        _ => Some(Problem::Unknown),
    }
}
