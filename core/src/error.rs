//! Error types for the service factory.
//!
//! # Design
//! HTTP responses with status >= 400 are NOT errors here: they come back as
//! `ServiceOutput` with the `error` side populated. `ServiceError` covers the
//! failures that prevent a structured output from existing at all: a template
//! that cannot be rendered, a transport that failed, or a body that could not
//! be decoded as the endpoint's declared accept type.

use std::time::Duration;

use thiserror::Error;

/// Boxed error produced by a `Transport` implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by services, registries and configuration loading.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A `{name}` placeholder was still present after all query values were applied.
    #[error("unresolved placeholder `{{{placeholder}}}` in `{url}`")]
    UnresolvedPlaceholder { placeholder: String, url: String },

    /// A header template referenced a key that is absent from the query.
    #[error("no value for `{key}` in template `{template}`")]
    MissingTemplateValue { key: String, template: String },

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(#[source] serde_json::Error),

    /// The response body is not valid JSON.
    #[error("deserialization failed: {0}")]
    DeserializationError(#[source] serde_json::Error),

    /// The response body is not a valid multipart document.
    #[error("multipart decoding failed: {0}")]
    Multipart(#[from] multer::Error),

    /// A form-data response arrived without a multipart boundary.
    #[error("response content type carries no multipart boundary")]
    MissingBoundary,

    /// The transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(#[source] BoxError),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// A descriptor or registry definition is unusable.
    #[error("invalid endpoint definition: {0}")]
    InvalidDescriptor(String),

    #[error("unknown endpoint `{0}`")]
    UnknownEndpoint(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ServiceError {
    /// Wrap any transport-specific error.
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        ServiceError::Transport(err.into())
    }
}
