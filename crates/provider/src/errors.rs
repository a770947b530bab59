//! Error types for the provider domain.
//!
//! [`ApiError`] is what a [`crate::TeamsApi`] implementation returns for a
//! failed remote call. [`ProviderError`] is what a lifecycle callback returns
//! to the host: either a wrapped [`ApiError`] or a failure detected locally
//! before any remote call was made.
//!
//! A missing remote entity during a read is *not* an error at the handler
//! level; handlers translate it into a cleared record identity instead.

use thiserror::Error;

/// Result alias used by every lifecycle callback.
pub type Result<T> = std::result::Result<T, ProviderError>;

// ---------------------------------------------------------------------------
// Remote API errors
// ---------------------------------------------------------------------------

/// A failed call against the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The addressed entity does not exist (HTTP 404).
    #[error("Not found: {resource}")]
    NotFound {
        /// Path or description of the entity that was requested.
        resource: String,
    },

    /// The remote API answered with a non-success status.
    #[error("GitHub API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The `message` field of the error body, or the raw body.
        message: String,
    },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the underlying failure.
        message: String,
    },

    /// A success response could not be decoded into the expected shape.
    #[error("Could not decode response: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },

    /// A value could not be placed in the request path as a single segment.
    /// No request was sent.
    #[error("Invalid path segment {segment:?}")]
    InvalidPathSegment {
        /// The rejected value.
        segment: String,
    },
}

impl ApiError {
    /// Returns `true` if this error means the remote entity is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ---------------------------------------------------------------------------
// Lifecycle errors
// ---------------------------------------------------------------------------

/// Errors returned from resource lifecycle callbacks.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A remote call failed; the message is surfaced verbatim.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A required attribute has no value.
    #[error("Missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Attribute name.
        attribute: String,
    },

    /// An attribute value is outside its allowed set or otherwise malformed.
    #[error("Invalid value {value:?} for attribute '{attribute}': {message}")]
    InvalidAttribute {
        /// Attribute name.
        attribute: String,
        /// The offending value.
        value: String,
        /// What was expected instead.
        message: String,
    },

    /// A record identity could not be decoded.
    #[error("Invalid id {id:?}: {message}")]
    InvalidId {
        /// The identifier as stored in the record.
        id: String,
        /// Why decoding failed.
        message: String,
    },

    /// The resource type does not implement the requested callback.
    #[error("{resource} does not support {operation}; changes force replacement")]
    UnsupportedOperation {
        /// Resource type name.
        resource: String,
        /// Lifecycle callback name.
        operation: String,
    },

    /// No handler is registered for a resource type name.
    #[error("Unknown resource type '{0}'")]
    UnknownResourceType(String),
}
