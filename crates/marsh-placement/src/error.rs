//! Error types for placement operations.

use thiserror::Error;

use crate::name::Level;

/// Result type for placement operations.
pub type Result<T> = std::result::Result<T, PlacementError>;

/// Errors that can occur while building names or computing placement.
///
/// Every variant describes a caller-side input problem. None of them are
/// transient, so retrying with the same input always fails the same way.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// A numeric placement parameter is out of range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in configuration.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A canonical path could not be parsed into a name.
    #[error("malformed canonical path '{input}': {reason}")]
    MalformedCanonicalPath {
        /// The rejected input.
        input: String,
        /// Why the input was rejected.
        reason: String,
    },

    /// A name segment is not usable as part of a canonical path.
    #[error("invalid {level} segment '{value}': {reason}")]
    InvalidSegment {
        /// Level of the rejected segment.
        level: Level,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// The name contains a wildcard and cannot be placed.
    #[error("'{0}' is a wildcard pattern and has no placement")]
    NotPlaceable(String),

    /// A memoized value was requested again with different parameters.
    #[error("{what} already computed for {cached}, requested for {requested}")]
    ParameterMismatch {
        /// Which memoized value was requested.
        what: &'static str,
        /// Parameters the cached value was computed with.
        cached: String,
        /// Parameters of the rejected request.
        requested: String,
    },

    /// Configuration could not be parsed or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlacementError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name, reason: reason.into() }
    }

    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedCanonicalPath { input: input.to_string(), reason: reason.into() }
    }
}
