//! Error types for constructing the API client.
//!
//! Call outcomes are reported as [`crate::Problem`] values instead; these
//! errors only surface before any request has been made.

/// Errors that can occur while setting up a [`crate::Client`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The configured base URL could not be parsed.
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// The configured `Accept` header is not a valid header value.
    #[error("Invalid Accept header value {0:?}")]
    InvalidAcceptHeader(String),
    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client")]
    Build(#[from] reqwest::Error),
}
