//! Error handling for the catvec containers
//!
//! Container operations are fail-soft: they report anomalies through
//! [`crate::diagnostics`] and return a fallback value. The error type defined
//! here is what gets reported, and what the explicit `try_*` accessors and the
//! configuration layer return.

use thiserror::Error;

/// Main error type for the catvec library
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// Index out of bounds access
    #[error("Out of bounds: index {index}, size {size}")]
    OutOfBounds {
        /// The invalid index
        index: usize,
        /// The valid size/length
        size: usize,
    },

    /// Operation that needs at least one element was called on an empty container
    #[error("Empty container: cannot {operation}")]
    Empty {
        /// Name of the rejected operation
        operation: &'static str,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl ContainerError {
    /// Create an out of bounds error
    pub fn out_of_bounds(index: usize, size: usize) -> Self {
        Self::OutOfBounds { index, size }
    }

    /// Create an empty container error
    pub fn empty(operation: &'static str) -> Self {
        Self::Empty { operation }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Bounds and empty-container anomalies leave the container untouched, so
    /// the caller can simply retry with valid input.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::OutOfBounds { .. } => true,
            Self::Empty { .. } => true,
            Self::Configuration { .. } => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::OutOfBounds { .. } => "bounds",
            Self::Empty { .. } => "empty",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ContainerError>;

/// Assert that an index is within bounds
#[inline]
pub fn check_bounds(index: usize, size: usize) -> Result<()> {
    if index >= size {
        Err(ContainerError::out_of_bounds(index, size))
    } else {
        Ok(())
    }
}
