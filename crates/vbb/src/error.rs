//! VBB client error types

use thiserror::Error;

/// Errors returned by the VBB client
///
/// Every variant produced by an API call names the operation and the request
/// path, so a failing departures lookup identifies its stop.
#[derive(Debug, Error)]
pub enum VbbError {
    /// The request could not be built or the transport reported a failure
    #[error("{operation}: request to {path} failed: {source}")]
    Request {
        /// Operation that issued the request
        operation: &'static str,
        /// Request path, relative to the configured base URL
        path: String,
        /// Underlying transport failure
        #[source]
        source: TransportError,
    },

    /// The response body was not valid JSON or did not have the expected shape
    #[error("{operation}: could not decode response from {path}: {source}")]
    Decode {
        /// Operation that issued the request
        operation: &'static str,
        /// Request path, relative to the configured base URL
        path: String,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl VbbError {
    /// Returns true if the transport gave up waiting for the service
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Request {
                source: TransportError::Http(e),
                ..
            } if e.is_timeout()
        )
    }
}

/// Cause of a [`VbbError::Request`]
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request URL could not be constructed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Connection, TLS, timeout or body transfer failure
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),
}
