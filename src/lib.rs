//! # linop
//!
//! **Lazy operator algebra for numerical code.**
//!
//! linop lets numeric transforms be combined with `+`, `-`, scalar `*` and
//! `/`, negation and composition without materializing intermediate
//! results. Every combination builds a small immutable tree; evaluating the
//! tree delegates depth-first to the user-supplied leaves that do the actual
//! numeric work.
//!
//! Linear operators additionally expose their adjoint and normal (gram)
//! operators, derived structurally from the tree.
//!
//! ## Quick Start
//!
//! ```
//! use linop::prelude::*;
//!
//! let f = LinearOperator::<f64>::self_adjoint("double", |x| Ok(2.0 * x));
//! let g = LinearOperator::<f64>::self_adjoint("double", |x| Ok(2.0 * x));
//!
//! assert_eq!((&f + &g).apply(&1.0)?, 4.0);
//! assert_eq!((&f - &g).apply(&1.0)?, 0.0);
//! assert_eq!((3 * &f).apply(&1.0)?, 6.0);
//! assert_eq!((&f / 2).apply(&1.0)?, 1.0);
//! assert_eq!((-&f).apply(&1.0)?, -2.0);
//! assert_eq!(f.compose(&g).apply(&1.0)?, 4.0);
//! assert_eq!(f.H().apply(&1.0)?, 2.0);
//! assert_eq!(f.gram().apply(&1.0)?, 4.0);
//! # Ok::<(), linop::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): Parallel element-wise arithmetic for `Vec` values
//! - `f16`: Half-precision floats (F16, BF16) as values

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algebra;
pub mod dtype;
pub mod error;
pub mod linop;
pub mod runtime;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algebra::{Algebra, Evaluate, Node, NodeKind, Operator};
    pub use crate::dtype::{Complex64, Complex128, Value};
    pub use crate::error::{Error, Result};
    pub use crate::linop::{LinOpOptions, LinearMap, LinearOperator};
    pub use crate::runtime::Device;
}
