//! Error types for population.

use fixture_core::SchemaError;

/// Error type for population operations.
///
/// Every variant is fatal for the enclosing top-level call: no partially
/// populated object is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum PopulateError {
    /// The caller supplied an invalid parameter (negative count, inverted range)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An instance of some type reached during traversal could not be constructed
    #[error("Unable to create an instance of '{type_name}' at '{path}': {reason}")]
    ObjectCreation {
        type_name: String,
        path: String,
        reason: String,
    },

    /// A container kind that is deliberately not supported was requested
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Failed to read a configuration file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Catalog error
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl PopulateError {
    pub(crate) fn invalid_range<T: std::fmt::Debug>(what: &str, min: T, max: T) -> Self {
        Self::InvalidArgument(format!(
            "{what} range minimum {min:?} must not be greater than maximum {max:?}"
        ))
    }
}
