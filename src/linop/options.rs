//! Solver parameters carried by linear operators

use crate::error::{Error, Result};

/// Iterative-solver configuration attached to a linear operator
///
/// The algebra never reads these values. They ride along with every derived
/// operator so a solver handed `(A.gram() + λ)` finds the same settings the
/// caller gave `A`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinOpOptions {
    /// Maximum number of solver iterations (default: 50)
    pub max_iter: usize,

    /// Convergence tolerance (default: 1e-3)
    pub tol: f64,
}

impl Default for LinOpOptions {
    fn default() -> Self {
        Self {
            max_iter: 50,
            tol: 1e-3,
        }
    }
}

impl LinOpOptions {
    /// Create options with explicit values
    pub fn new(max_iter: usize, tol: f64) -> Self {
        Self { max_iter, tol }
    }

    /// Replace the iteration limit
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Replace the tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Check the values are usable by a solver
    ///
    /// Operators accept any values; solvers call this before iterating.
    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(Error::InvalidArgument {
                arg: "max_iter",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(Error::InvalidArgument {
                arg: "tol",
                reason: format!("must be a positive finite number, got {}", self.tol),
            });
        }
        Ok(())
    }
}
