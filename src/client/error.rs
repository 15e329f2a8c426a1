//! Error types for upstream service calls.

use thiserror::Error;

/// Everything that can go wrong while talking to a third-party service.
///
/// `Display` output is what ends up in a widget's `{error: ...}` record, so
/// messages are written for the dashboard reader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network connectivity error (DNS, connection refused, TLS, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded its deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Service answered with a non-2xx status.
    #[error("HTTP Error: {status} {reason}")]
    Upstream { status: u16, reason: String },

    /// Body was not valid JSON or did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Base URL and path could not be combined into a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Service rejected the configured credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),
}

impl FetchError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout_ms)
        } else if err.is_decode() {
            FetchError::InvalidResponse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
