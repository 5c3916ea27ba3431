//! Error taxonomy for the source-client boundary.
//!
//! Typed errors travel outward only as far as the provider layer, which
//! converts any failure into an empty contribution. Nothing above a provider
//! ever sees an `ApiError`.

use std::fmt;

/// Failure at the source-client boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The transport could not complete the request (network failure,
    /// timeout, or an HTTP error status).
    Connection(String),
    /// The response arrived but was not parseable or lacked the expected
    /// structure.
    DataFormat(String),
    /// Anything else at the client boundary.
    Unexpected(String),
}

impl ApiError {
    /// Short tag used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Connection(_) => "connection",
            ApiError::DataFormat(_) => "data_format",
            ApiError::Unexpected(_) => "unexpected",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Connection(msg) => {
                write!(f, "connection error when fetching users: {}", msg)
            }
            ApiError::DataFormat(msg) => {
                write!(f, "invalid data from upstream: {}", msg)
            }
            ApiError::Unexpected(msg) => {
                write!(f, "unexpected error when fetching users: {}", msg)
            }
        }
    }
}

impl std::error::Error for ApiError {}
