//! Error types for the Alexa web API client.
//!
//! Authentication failures (token exchange rejected, no CSRF cookie found) are
//! not errors: [`SessionManager::login`](crate::SessionManager::login) reports
//! them as `Ok(false)`. Everything here is a failure the caller has to handle.

use thiserror::Error;

/// Errors that can occur when talking to the Alexa web API.
#[derive(Debug, Error)]
pub enum AlexaError {
    /// HTTP transport error (DNS, TLS, connection reset, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON shape the endpoint is known to return.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The token exchange succeeded but carried no cookies for the storefront.
    #[error("token exchange returned no cookies for domain {domain}")]
    MissingCookies {
        /// Cookie domain that was looked up, e.g. `.amazon.co.uk`.
        domain: String,
    },

    /// File I/O error while writing the credential store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The Unicode collator used to sort devices could not be built.
    #[error("collation error: {0}")]
    Collation(String),

    /// Catch-all for other errors (e.g. missing home directory).
    #[error("{0}")]
    Other(String),
}

/// Convenience alias for `Result<T, AlexaError>`.
pub type Result<T> = std::result::Result<T, AlexaError>;
