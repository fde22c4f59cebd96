//! Error types for feed operations.
//!
//! This module defines [`DataError`] which covers all error cases that can occur
//! when fetching, decoding, or normalizing a company filing feed.

use thiserror::Error;

/// Errors that can occur during feed operations.
#[derive(Error, Debug)]
pub enum DataError {
    /// The query was empty or otherwise unusable. No request is issued.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Network-related errors (connection failures, timeouts, HTTP status).
    #[error("Network error: {0}")]
    Network(String),

    /// The response body was not a well-formed feed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The feed was well-formed but carried no usable company metadata.
    #[error("No company metadata for query: {0}")]
    UnknownCompany(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;
