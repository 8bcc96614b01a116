//! Common test utilities
#![allow(dead_code)]

use linop::dtype::Complex128;
use linop::prelude::*;
use std::sync::Arc;

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two complex slices are close within tolerance
pub fn assert_allclose_c128(a: &[Complex128], b: &[Complex128], atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (*x - *y).magnitude();
        assert!(
            diff <= atol,
            "{}: element {} differs: {} vs {} (diff={})",
            msg,
            i,
            x,
            y,
            diff
        );
    }
}

/// Real inner product ⟨x, y⟩
pub fn dot(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}

/// Complex inner product ⟨x, y⟩ = Σ conj(xᵢ) yᵢ
pub fn cdot(x: &[Complex128], y: &[Complex128]) -> Complex128 {
    x.iter()
        .zip(y)
        .fold(Complex128::ZERO, |acc, (a, b)| acc + a.conj() * *b)
}

/// Row-major dense matrix
#[derive(Clone, Debug)]
pub struct Matrix<E> {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<E>,
}

impl Matrix<f64> {
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    /// A x
    pub fn matvec(&self, x: &[f64]) -> Result<Vec<f64>> {
        if x.len() != self.cols {
            return Err(Error::length_mismatch(self.cols, x.len()));
        }
        Ok((0..self.rows)
            .map(|i| dot(&self.data[i * self.cols..(i + 1) * self.cols], x))
            .collect())
    }

    /// Aᵀ y
    pub fn rmatvec(&self, y: &[f64]) -> Result<Vec<f64>> {
        if y.len() != self.rows {
            return Err(Error::length_mismatch(self.rows, y.len()));
        }
        Ok((0..self.cols)
            .map(|j| (0..self.rows).map(|i| self.data[i * self.cols + j] * y[i]).sum())
            .collect())
    }
}

impl Matrix<Complex128> {
    pub fn new_complex(rows: usize, cols: usize, data: Vec<Complex128>) -> Self {
        assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    /// A x
    pub fn matvec(&self, x: &[Complex128]) -> Result<Vec<Complex128>> {
        if x.len() != self.cols {
            return Err(Error::length_mismatch(self.cols, x.len()));
        }
        Ok((0..self.rows)
            .map(|i| {
                (0..self.cols).fold(Complex128::ZERO, |acc, j| {
                    acc + self.data[i * self.cols + j] * x[j]
                })
            })
            .collect())
    }

    /// Aᴴ y
    pub fn rmatvec(&self, y: &[Complex128]) -> Result<Vec<Complex128>> {
        if y.len() != self.rows {
            return Err(Error::length_mismatch(self.rows, y.len()));
        }
        Ok((0..self.cols)
            .map(|j| {
                (0..self.rows).fold(Complex128::ZERO, |acc, i| {
                    acc + self.data[i * self.cols + j].conj() * y[i]
                })
            })
            .collect())
    }
}

/// Wrap a real matrix as a linear operator
pub fn dense(name: &'static str, m: Matrix<f64>) -> LinearOperator<Vec<f64>> {
    let m = Arc::new(m);
    let mt = Arc::clone(&m);
    LinearOperator::named(name, move |x: &Vec<f64>| m.matvec(x), move |y: &Vec<f64>| mt.rmatvec(y))
}

/// Wrap a complex matrix as a linear operator
pub fn dense_complex(
    name: &'static str,
    m: Matrix<Complex128>,
) -> LinearOperator<Vec<Complex128>> {
    let m = Arc::new(m);
    let mh = Arc::clone(&m);
    LinearOperator::named(
        name,
        move |x: &Vec<Complex128>| m.matvec(x),
        move |y: &Vec<Complex128>| mh.rmatvec(y),
    )
}
