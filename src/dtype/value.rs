//! Value trait: the arithmetic an operator tree needs from its data

use crate::error::{Error, Result};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Minimum `Vec` length before element-wise arithmetic is split across threads
#[cfg(feature = "rayon")]
pub const PARALLEL_MIN_LEN: usize = 4096;

/// Trait for types that operators map between
///
/// Combinator nodes never look inside a value; they only add, subtract,
/// negate and scale the outputs of their operands. Any type providing
/// those operations can flow through an operator tree.
///
/// # Fallibility
///
/// `try_add` and `try_sub` return `Result` so container types can reject
/// operands of different shapes instead of panicking. Scalar scaling is
/// infallible.
///
/// # Scalars
///
/// Scalars are always `f64`. Reduced-precision value types round the
/// product back to their own precision.
pub trait Value: Clone + Send + Sync + 'static {
    /// Element-wise sum `self + rhs`
    fn try_add(&self, rhs: &Self) -> Result<Self>;

    /// Element-wise difference `self - rhs`
    fn try_sub(&self, rhs: &Self) -> Result<Self>;

    /// Negation `-self`
    fn negate(&self) -> Self;

    /// Scalar product `c * self`
    fn scale(&self, c: f64) -> Self;

    /// Scalar quotient `self / c`
    fn unscale(&self, c: f64) -> Self;
}

macro_rules! impl_value_float {
    ($float:ty) => {
        impl Value for $float {
            #[inline]
            fn try_add(&self, rhs: &Self) -> Result<Self> {
                Ok(self + rhs)
            }

            #[inline]
            fn try_sub(&self, rhs: &Self) -> Result<Self> {
                Ok(self - rhs)
            }

            #[inline]
            fn negate(&self) -> Self {
                -self
            }

            #[inline]
            fn scale(&self, c: f64) -> Self {
                (c as $float) * self
            }

            #[inline]
            fn unscale(&self, c: f64) -> Self {
                self / (c as $float)
            }
        }
    };
}

impl_value_float!(f32);
impl_value_float!(f64);

#[cfg(feature = "f16")]
macro_rules! impl_value_half {
    ($half:ty) => {
        impl Value for $half {
            #[inline]
            fn try_add(&self, rhs: &Self) -> Result<Self> {
                Ok(<$half>::from_f32(self.to_f32() + rhs.to_f32()))
            }

            #[inline]
            fn try_sub(&self, rhs: &Self) -> Result<Self> {
                Ok(<$half>::from_f32(self.to_f32() - rhs.to_f32()))
            }

            #[inline]
            fn negate(&self) -> Self {
                -*self
            }

            #[inline]
            fn scale(&self, c: f64) -> Self {
                <$half>::from_f64(c * self.to_f64())
            }

            #[inline]
            fn unscale(&self, c: f64) -> Self {
                <$half>::from_f64(self.to_f64() / c)
            }
        }
    };
}

#[cfg(feature = "f16")]
impl_value_half!(half::f16);
#[cfg(feature = "f16")]
impl_value_half!(half::bf16);

// ============================================================================
// Vec<V>: flat element-wise containers
// ============================================================================

fn check_len<V>(lhs: &[V], rhs: &[V]) -> Result<()> {
    if lhs.len() != rhs.len() {
        return Err(Error::length_mismatch(lhs.len(), rhs.len()));
    }
    Ok(())
}

#[cfg(feature = "rayon")]
fn zip_with<V: Value>(
    lhs: &[V],
    rhs: &[V],
    f: impl Fn(&V, &V) -> Result<V> + Send + Sync,
) -> Result<Vec<V>> {
    check_len(lhs, rhs)?;
    if lhs.len() >= PARALLEL_MIN_LEN {
        lhs.par_iter().zip(rhs.par_iter()).map(|(a, b)| f(a, b)).collect()
    } else {
        lhs.iter().zip(rhs).map(|(a, b)| f(a, b)).collect()
    }
}

#[cfg(not(feature = "rayon"))]
fn zip_with<V: Value>(
    lhs: &[V],
    rhs: &[V],
    f: impl Fn(&V, &V) -> Result<V> + Send + Sync,
) -> Result<Vec<V>> {
    check_len(lhs, rhs)?;
    lhs.iter().zip(rhs).map(|(a, b)| f(a, b)).collect()
}

#[cfg(feature = "rayon")]
fn map_each<V: Value>(values: &[V], f: impl Fn(&V) -> V + Send + Sync) -> Vec<V> {
    if values.len() >= PARALLEL_MIN_LEN {
        values.par_iter().map(f).collect()
    } else {
        values.iter().map(f).collect()
    }
}

#[cfg(not(feature = "rayon"))]
fn map_each<V: Value>(values: &[V], f: impl Fn(&V) -> V + Send + Sync) -> Vec<V> {
    values.iter().map(f).collect()
}

impl<V: Value> Value for Vec<V> {
    fn try_add(&self, rhs: &Self) -> Result<Self> {
        zip_with(self, rhs, |a, b| a.try_add(b))
    }

    fn try_sub(&self, rhs: &Self) -> Result<Self> {
        zip_with(self, rhs, |a, b| a.try_sub(b))
    }

    fn negate(&self) -> Self {
        map_each(self, |v| v.negate())
    }

    fn scale(&self, c: f64) -> Self {
        map_each(self, |v| v.scale(c))
    }

    fn unscale(&self, c: f64) -> Self {
        map_each(self, |v| v.unscale(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_value_ops() {
        assert_eq!(2.0f64.try_add(&3.0).unwrap(), 5.0);
        assert_eq!(2.0f64.try_sub(&3.0).unwrap(), -1.0);
        assert_eq!(2.0f64.negate(), -2.0);
        assert_eq!(2.0f64.scale(3.0), 6.0);
        assert_eq!(3.0f64.unscale(2.0), 1.5);
        assert_eq!(1.5f32.scale(2.0), 3.0f32);
    }

    #[test]
    fn test_vec_value_ops() {
        let a = vec![1.0f64, 2.0, 3.0];
        let b = vec![0.5f64, 0.5, 0.5];
        assert_eq!(a.try_add(&b).unwrap(), vec![1.5, 2.5, 3.5]);
        assert_eq!(a.try_sub(&b).unwrap(), vec![0.5, 1.5, 2.5]);
        assert_eq!(a.negate(), vec![-1.0, -2.0, -3.0]);
        assert_eq!(a.scale(2.0), vec![2.0, 4.0, 6.0]);
        assert_eq!(a.unscale(2.0), vec![0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_vec_length_mismatch() {
        let a = vec![1.0f64, 2.0, 3.0];
        let b = vec![1.0f64];
        match a.try_add(&b) {
            Err(Error::ShapeMismatch { expected, got }) => {
                assert_eq!(expected, vec![3]);
                assert_eq!(got, vec![1]);
            }
            other => panic!("expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_vec() {
        let a = vec![vec![1.0f64, 2.0], vec![3.0]];
        let b = vec![vec![1.0f64, 1.0], vec![1.0]];
        assert_eq!(a.try_add(&b).unwrap(), vec![vec![2.0, 3.0], vec![4.0]]);

        let ragged = vec![vec![1.0f64], vec![3.0]];
        assert!(a.try_sub(&ragged).is_err());
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_vec_parallel_path() {
        let n = PARALLEL_MIN_LEN * 2;
        let a: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let sum = a.try_add(&a).unwrap();
        assert_eq!(sum.len(), n);
        assert!(sum.iter().enumerate().all(|(i, v)| *v == 2.0 * i as f64));
        assert_eq!(a.scale(0.5)[n - 1], (n - 1) as f64 * 0.5);
    }

    #[cfg(feature = "f16")]
    #[test]
    fn test_half_value_ops() {
        let x = half::f16::from_f32(1.5);
        assert_eq!(x.scale(2.0).to_f32(), 3.0);
        assert_eq!(x.negate().to_f32(), -1.5);
        let y = half::bf16::from_f32(4.0);
        assert_eq!(y.unscale(2.0).to_f32(), 2.0);
    }
}
