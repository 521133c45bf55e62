//! Approximate matrix comparison.

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;

use crate::{CxError, ONE, Result};

/// Element-wise tolerance: `|a - b| <= atol + rtol * |b|`.
///
/// `b` is the reference side, so the check is not symmetric. The defaults
/// are numpy's `allclose` defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance {
            rtol: 1e-5,
            atol: 1e-8,
        }
    }
}

impl Tolerance {
    pub fn new(rtol: f64, atol: f64) -> Result<Self> {
        let valid = |x: f64| x.is_finite() && x >= 0.0;
        if !valid(rtol) || !valid(atol) {
            return Err(CxError::InvalidTolerance { rtol, atol });
        }
        Ok(Tolerance { rtol, atol })
    }

    #[inline]
    pub fn accepts(&self, a: Complex64, b: Complex64) -> bool {
        (a - b).norm() <= self.atol + self.rtol * b.norm()
    }
}

/// True when `a` and `b` share a shape and every pair of entries is within
/// `tol`. Mismatched shapes compare unequal.
pub fn allclose(a: &Array2<Complex64>, b: &Array2<Complex64>, tol: Tolerance) -> bool {
    if a.dim() != b.dim() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(&x, &y)| tol.accepts(x, y))
}

/// Largest element-wise `|a - b|`, or `None` for mismatched shapes.
pub fn max_deviation(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Option<f64> {
    if a.dim() != b.dim() {
        return None;
    }
    Some(
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).norm())
            .fold(0.0, f64::max),
    )
}

/// Conjugate transpose.
pub fn adjoint(matrix: ArrayView2<Complex64>) -> Array2<Complex64> {
    Array2::from_shape_fn((matrix.ncols(), matrix.nrows()), |(i, j)| {
        matrix[(j, i)].conj()
    })
}

/// Element-wise check that `U U^dagger` is the identity: any entry off by
/// more than `tol` in magnitude fails.
pub fn is_unitary(u: &Array2<Complex64>, tol: f64) -> bool {
    let (rows, cols) = u.dim();
    if rows != cols || rows == 0 {
        return false;
    }
    let product = u.dot(&adjoint(u.view()));
    !product.indexed_iter().any(|((row, col), value)| {
        if row == col {
            (value - ONE).norm() > tol
        } else {
            value.norm() > tol
        }
    })
}
