//! Client construction errors.
//!
//! Failures of individual API calls are reported as [`provider::ApiError`];
//! this module only covers problems building the client itself.

use thiserror::Error;

/// Errors raised while constructing a [`crate::GithubClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The base URL is not an absolute `http(s)` URL.
    #[error("Invalid GitHub base URL '{url}': expected an http:// or https:// URL")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
    },

    /// A configured value cannot be sent as an HTTP header.
    #[error("Invalid value for header '{header}'")]
    InvalidHeader {
        /// Header name.
        header: &'static str,
    },

    /// The underlying HTTP client could not be built (e.g. TLS backend).
    #[error("Could not build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
