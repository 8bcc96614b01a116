//! Operator algebra
//!
//! Operators combine lazily: `a + b`, `a - b`, `a * s`, `s * a`, `a / s`,
//! `-a` and `a.compose(&b)` build a new immutable tree node that holds
//! shared references to its operands. Nothing is evaluated until the tree is
//! applied to a value, at which point each node delegates to its operands
//! depth-first.
//!
//! # Families
//!
//! Every operator family implements [`Algebra`] by providing a single
//! rebuild hook, [`Algebra::from_node`], which turns an abstract [`Node`]
//! into a concrete instance of the family. The combinators themselves are
//! shared. [`impl_algebra_ops!`] then derives the arithmetic operator
//! overloads for the family.
//!
//! ```text
//! a + b ──► Node::Add(a, b) ──► Family::from_node ──► Family
//! ```
//!
//! # Scalars and identity
//!
//! Adding a scalar to an operator shifts it by a scaled identity:
//! `a + s` is `a + s·I`, and `s - a` is `(-a) + s`, i.e. `s·I - a`.
//! The identity itself is the empty composite, which is also what `a.pow(0)`
//! returns.
//!
//! Scalars are real. The overloads accept `f64` and `i32` directly; any other
//! numeric type (`f32`, `i64`, `u32`, ...) converts with `as f64` or goes
//! through the named combinators:
//!
//! ```
//! use linop::prelude::*;
//!
//! let a = Operator::<f64>::from_fn(|x| Ok(x + 1.0));
//! let (w, k) = (0.5f32, 3u32);
//!
//! assert_eq!((&a * w as f64).apply(&1.0)?, 1.0);
//! assert_eq!(a.div_scalar(k as f64).apply(&2.0)?, 1.0);
//! # Ok::<(), linop::error::Error>(())
//! ```

mod node;
mod operator;

pub use node::{Node, NodeKind, Operands};
pub use operator::{Evaluate, Operator};

use smallvec::{SmallVec, smallvec};

/// Shared combinators for an operator family
///
/// Every method returns a fresh instance and leaves its operands untouched.
/// Scalar arguments are `f64`; convert other numeric types with `as f64`.
pub trait Algebra: Clone + Sized {
    /// Rebuild an abstract node as a concrete instance of this family
    fn from_node(node: Node<Self>) -> Self;

    /// The identity operator of this family
    fn identity() -> Self {
        Self::from_node(Node::Composite(SmallVec::new()))
    }

    /// An identity operator that inherits whatever configuration `self` carries
    fn identity_like(&self) -> Self {
        Self::identity()
    }

    /// The zero operator, `0·I`
    fn zero() -> Self {
        Self::identity().mul_scalar(0.0)
    }

    /// `self + rhs`
    fn plus(&self, rhs: &Self) -> Self {
        Self::from_node(Node::Add(self.clone(), rhs.clone()))
    }

    /// `self - rhs`
    fn minus(&self, rhs: &Self) -> Self {
        Self::from_node(Node::Sub(self.clone(), rhs.clone()))
    }

    /// `c * self`
    fn mul_scalar(&self, c: f64) -> Self {
        Self::from_node(Node::Mul(self.clone(), c))
    }

    /// `self / c`
    fn div_scalar(&self, c: f64) -> Self {
        Self::from_node(Node::Div(self.clone(), c))
    }

    /// `-self`
    fn negated(&self) -> Self {
        Self::from_node(Node::Neg(self.clone()))
    }

    /// `self ∘ inner`: apply `inner` first, then `self`
    fn compose(&self, inner: &Self) -> Self {
        Self::from_node(Node::Composite(smallvec![self.clone(), inner.clone()]))
    }

    /// `self ∘ self ∘ ... ∘ self` (`n` applications)
    ///
    /// `pow(0)` is the identity.
    fn pow(&self, n: u32) -> Self {
        if n == 0 {
            return self.identity_like();
        }
        Self::from_node(Node::Composite((0..n).map(|_| self.clone()).collect()))
    }

    /// `self + s·I`
    fn shift(&self, s: f64) -> Self {
        self.plus(&self.identity_like().mul_scalar(s))
    }

    /// `s·I - self`, built as `(-self) + s`
    fn rsub_scalar(&self, s: f64) -> Self {
        self.negated().shift(s)
    }
}

/// Sum operators pairwise so the tree is `⌈log₂ n⌉` additions deep
///
/// Evaluation recurses once per level, so depth must stay logarithmic in the
/// number of summands. Neighbours are merged in order; the first summand stays
/// leftmost and families inherit its configuration. An empty input is the
/// zero operator.
pub(crate) fn balanced_sum<A: Algebra>(mut level: Vec<A>) -> A {
    while level.len() > 1 {
        level = level
            .chunks(2)
            .filter_map(|pair| pair.iter().cloned().reduce(|a, b| a.plus(&b)))
            .collect();
    }
    level.pop().unwrap_or_else(A::zero)
}

/// Derive the arithmetic operator overloads for an operator family
///
/// The family must be a generic type `Family<T: Value>` implementing
/// [`Algebra`]. Scalars may be `f64` or `i32`; each scalar kind maps to a
/// distinct literal type, so `3 * a` and `a / 2.0` both infer without
/// annotations. A second float or integer type would make bare literals
/// ambiguous, so other scalar types go through `as f64`.
macro_rules! impl_algebra_ops {
    ($family:ident) => {
        impl<T: $crate::dtype::Value> ::std::ops::Add for $family<T> {
            type Output = $family<T>;

            fn add(self, rhs: Self) -> $family<T> {
                $crate::algebra::Algebra::plus(&self, &rhs)
            }
        }

        impl<'a, T: $crate::dtype::Value> ::std::ops::Add<&'a $family<T>> for &'a $family<T> {
            type Output = $family<T>;

            fn add(self, rhs: &'a $family<T>) -> $family<T> {
                $crate::algebra::Algebra::plus(self, rhs)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Sub for $family<T> {
            type Output = $family<T>;

            fn sub(self, rhs: Self) -> $family<T> {
                $crate::algebra::Algebra::minus(&self, &rhs)
            }
        }

        impl<'a, T: $crate::dtype::Value> ::std::ops::Sub<&'a $family<T>> for &'a $family<T> {
            type Output = $family<T>;

            fn sub(self, rhs: &'a $family<T>) -> $family<T> {
                $crate::algebra::Algebra::minus(self, rhs)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Add<&$family<T>> for $family<T> {
            type Output = $family<T>;

            fn add(self, rhs: &$family<T>) -> $family<T> {
                $crate::algebra::Algebra::plus(&self, rhs)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Add<$family<T>> for &$family<T> {
            type Output = $family<T>;

            fn add(self, rhs: $family<T>) -> $family<T> {
                $crate::algebra::Algebra::plus(self, &rhs)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Sub<&$family<T>> for $family<T> {
            type Output = $family<T>;

            fn sub(self, rhs: &$family<T>) -> $family<T> {
                $crate::algebra::Algebra::minus(&self, rhs)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Sub<$family<T>> for &$family<T> {
            type Output = $family<T>;

            fn sub(self, rhs: $family<T>) -> $family<T> {
                $crate::algebra::Algebra::minus(self, &rhs)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Neg for $family<T> {
            type Output = $family<T>;

            fn neg(self) -> $family<T> {
                $crate::algebra::Algebra::negated(&self)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Neg for &$family<T> {
            type Output = $family<T>;

            fn neg(self) -> $family<T> {
                $crate::algebra::Algebra::negated(self)
            }
        }

        impl<T: $crate::dtype::Value> ::std::iter::Sum for $family<T> {
            /// Sum of all operators; the empty sum is the zero operator
            fn sum<I: Iterator<Item = $family<T>>>(iter: I) -> $family<T> {
                $crate::algebra::balanced_sum(iter.collect())
            }
        }

        impl<'a, T: $crate::dtype::Value> ::std::iter::Sum<&'a $family<T>> for $family<T> {
            fn sum<I: Iterator<Item = &'a $family<T>>>(iter: I) -> $family<T> {
                iter.cloned().sum()
            }
        }

        $crate::algebra::impl_algebra_ops!(@scalar $family, f64);
        $crate::algebra::impl_algebra_ops!(@scalar $family, i32);
    };

    (@scalar $family:ident, $scalar:ty) => {
        impl<T: $crate::dtype::Value> ::std::ops::Mul<$scalar> for $family<T> {
            type Output = $family<T>;

            fn mul(self, c: $scalar) -> $family<T> {
                $crate::algebra::Algebra::mul_scalar(&self, c as f64)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Mul<$scalar> for &$family<T> {
            type Output = $family<T>;

            fn mul(self, c: $scalar) -> $family<T> {
                $crate::algebra::Algebra::mul_scalar(self, c as f64)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Mul<$family<T>> for $scalar {
            type Output = $family<T>;

            fn mul(self, op: $family<T>) -> $family<T> {
                $crate::algebra::Algebra::mul_scalar(&op, self as f64)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Mul<&$family<T>> for $scalar {
            type Output = $family<T>;

            fn mul(self, op: &$family<T>) -> $family<T> {
                $crate::algebra::Algebra::mul_scalar(op, self as f64)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Div<$scalar> for $family<T> {
            type Output = $family<T>;

            fn div(self, c: $scalar) -> $family<T> {
                $crate::algebra::Algebra::div_scalar(&self, c as f64)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Div<$scalar> for &$family<T> {
            type Output = $family<T>;

            fn div(self, c: $scalar) -> $family<T> {
                $crate::algebra::Algebra::div_scalar(self, c as f64)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Add<$scalar> for $family<T> {
            type Output = $family<T>;

            fn add(self, s: $scalar) -> $family<T> {
                $crate::algebra::Algebra::shift(&self, s as f64)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Add<$scalar> for &$family<T> {
            type Output = $family<T>;

            fn add(self, s: $scalar) -> $family<T> {
                $crate::algebra::Algebra::shift(self, s as f64)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Add<$family<T>> for $scalar {
            type Output = $family<T>;

            fn add(self, op: $family<T>) -> $family<T> {
                $crate::algebra::Algebra::shift(&op, self as f64)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Add<&$family<T>> for $scalar {
            type Output = $family<T>;

            fn add(self, op: &$family<T>) -> $family<T> {
                $crate::algebra::Algebra::shift(op, self as f64)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Sub<$scalar> for $family<T> {
            type Output = $family<T>;

            fn sub(self, s: $scalar) -> $family<T> {
                $crate::algebra::Algebra::shift(&self, -(s as f64))
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Sub<$scalar> for &$family<T> {
            type Output = $family<T>;

            fn sub(self, s: $scalar) -> $family<T> {
                $crate::algebra::Algebra::shift(self, -(s as f64))
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Sub<$family<T>> for $scalar {
            type Output = $family<T>;

            fn sub(self, op: $family<T>) -> $family<T> {
                $crate::algebra::Algebra::rsub_scalar(&op, self as f64)
            }
        }

        impl<T: $crate::dtype::Value> ::std::ops::Sub<&$family<T>> for $scalar {
            type Output = $family<T>;

            fn sub(self, op: &$family<T>) -> $family<T> {
                $crate::algebra::Algebra::rsub_scalar(op, self as f64)
            }
        }
    };
}

pub(crate) use impl_algebra_ops;
