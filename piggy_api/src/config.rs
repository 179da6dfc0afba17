//! Client configuration: base URL, request timeout, and the `Accept` header.

use std::time::Duration;

/// Default base URL of the remote service.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Media type sent in the `Accept` header of every request.
pub const DEFAULT_ACCEPT: &str = "application/vnd.github.v3+json";

/// Configurable options for [`crate::Client`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL every request path is appended to.
    pub url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Value of the default `Accept` header.
    pub accept: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            accept: DEFAULT_ACCEPT.to_string(),
        }
    }
}

impl ApiConfig {
    /// Reads `PIGGY_API_URL` and `PIGGY_API_TIMEOUT_MS`, falling back to the
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = env_string("PIGGY_API_URL") {
            config.url = url;
        }
        config.timeout =
            Duration::from_millis(env_u64("PIGGY_API_TIMEOUT_MS", DEFAULT_TIMEOUT_MS));
        config
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env_string(key) {
        None => default,
        Some(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
    }
}
