//! Error types for geiton.

use thiserror::Error;

/// Errors that can occur during index construction, insertion, or search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// Empty index (no vectors inserted yet).
    #[error("index is empty")]
    EmptyIndex,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between a vector and the index.
    #[error("dimension mismatch: index has {expected} dimensions, vector has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result type alias for geiton operations.
pub type Result<T> = std::result::Result<T, IndexError>;
