//! Error types for catalog access.

use reqwest::StatusCode;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors surfaced by the catalog client.
///
/// Failures propagate to the caller unchanged; this pipeline performs no
/// retries of its own.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog service could not be reached, or its response could not
    /// be decoded.
    #[error("catalog unavailable: {0}")]
    Unavailable(#[source] reqwest::Error),

    /// The catalog service answered with a non-success status.
    #[error("catalog request failed ({status}): {message}")]
    Api {
        /// HTTP status returned by the catalog.
        status: StatusCode,
        /// Response body, verbatim.
        message: String,
    },
}

impl CatalogError {
    /// Creates an API error from a status and response body.
    #[must_use]
    pub fn api(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
