//! Approximate equality.

use crate::complex::Complex64;
use crate::ndarray::NdArray;
use crate::{NumkError, Result};

/// Relative/absolute tolerance pair for [`is_close`].
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rtol: 1e-5,
            atol: 1e-8,
        }
    }
}

/// `|a - b| <= atol + rtol * |b|`.
pub fn is_close(a: f64, b: f64, tol: Tolerance) -> bool {
    (a - b).abs() <= tol.atol + tol.rtol * b.abs()
}

/// [`is_close`] on both components.
pub fn is_close_complex(a: Complex64, b: Complex64, tol: Tolerance) -> bool {
    is_close(a.re, b.re, tol) && is_close(a.im, b.im, tol)
}

/// Elementwise [`is_close_complex`] as a 0/1 mask.
///
/// # Errors
/// Fails with [`NumkError::ShapeMismatch`] unless the shapes are
/// identical.
pub fn is_close_array(a: &NdArray, b: &NdArray, tol: Tolerance) -> Result<NdArray> {
    if a.shape() != b.shape() {
        return Err(NumkError::ShapeMismatch(
            a.shape().to_vec(),
            b.shape().to_vec(),
        ));
    }
    let mask: Vec<f64> = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| if is_close_complex(x, y, tol) { 1.0 } else { 0.0 })
        .collect();
    NdArray::of(&mask).reshape(a.shape())
}
