//! Error types for the fan-out core.

use thiserror::Error;

/// Result type alias using the volley error type.
pub type Result<T> = std::result::Result<T, VolleyError>;

/// Main error type for the fan-out core and its boundary helpers.
#[derive(Error, Debug)]
pub enum VolleyError {
    /// Caller passed a parameter outside its documented domain
    /// (negative delay bound, zero count where an average is taken, ...)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A key was absent while walking a nested value
    #[error("Key '{key}' not found in nested map")]
    LookupFailure {
        /// The missing key
        key: String,
    },

    /// The upstream endpoint had no resource for the requested url
    #[error("Upstream resource not found: {url}")]
    UpstreamNotFound {
        /// The url that produced the not-found response
        url: String,
    },

    /// A spawned unit panicked or was torn down before completing
    #[error("Batch task failed to join: {0}")]
    Task(String),

    /// HTTP client error
    #[error("HTTP request failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General error from anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
