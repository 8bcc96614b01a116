//! Error types for linop

use crate::runtime::Device;
use thiserror::Error;

/// Result type alias using linop's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or evaluating operators
#[derive(Error, Debug)]
pub enum Error {
    /// Shape mismatch in element-wise value arithmetic
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Invalid argument provided to a constructor or combinator
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// A relocatable operand failed to move to the requested device
    #[error("Failed to relocate '{operand}' to {device}: {reason}")]
    Relocation {
        /// Name of the operand that failed
        operand: String,
        /// Requested target device
        device: Device,
        /// Reason reported by the operand
        reason: String,
    },

    /// A user-supplied leaf operator failed during evaluation
    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    /// Catch-all for leaf and map implementations
    ///
    /// Custom [`Evaluate`](crate::algebra::Evaluate) and
    /// [`LinearMap`](crate::linop::LinearMap) implementations report failures
    /// that fit no other variant here, typically from `relocate`. The
    /// operators themselves never construct it.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an evaluation error from any displayable message
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Create an internal error, for leaf implementations
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a shape mismatch error for two flat lengths
    pub fn length_mismatch(expected: usize, got: usize) -> Self {
        Self::ShapeMismatch {
            expected: vec![expected],
            got: vec![got],
        }
    }
}
