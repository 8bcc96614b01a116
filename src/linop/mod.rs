//! Linear operator algebra
//!
//! A [`LinearOperator`] is an operator tree whose leaves are
//! forward/adjoint map pairs. It combines exactly like a generic
//! [`Operator`](crate::algebra::Operator) and adds two derived views:
//!
//! - **adjoint** (`adjoint()`, `adj()`, `H()`): built structurally from the
//!   tree, never numerically
//! - **gram** (`gram()`, `N()`): the normal operator `Aᴴ ∘ A`
//!
//! # Architecture
//!
//! ```text
//! LinearOperator
//! ├── Algebra       (combinators, shared with Operator)
//! ├── LinearMap     (apply_forward / apply_adjoint: usable as a leaf itself)
//! └── Evaluate      (usable as a generic Operator leaf)
//! ```
//!
//! # Regularized normal equations
//!
//! Scalar shifts make the usual least-squares operators one-liners:
//!
//! ```
//! use linop::prelude::*;
//!
//! let a = LinearOperator::<Vec<f64>>::named(
//!     "weights",
//!     |x| Ok(x.iter().map(|v| 3.0 * v).collect()),
//!     |y| Ok(y.iter().map(|v| 3.0 * v).collect()),
//! );
//! // (AᴴA + 0.5 I) x
//! let normal = a.gram() + 0.5;
//! assert_eq!(normal.apply(&vec![2.0])?, vec![19.0]);
//! // self-adjoint by construction
//! assert_eq!(normal.H().apply(&vec![2.0])?, vec![19.0]);
//! # Ok::<(), linop::error::Error>(())
//! ```

mod map;
mod operator;
mod options;

pub use map::LinearMap;
pub use operator::LinearOperator;
pub use options::LinOpOptions;
