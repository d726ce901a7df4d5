//! The closed numeric union dispatched over by [`crate::union_method!`].

use std::fmt;

use crate::complex::{c64, Complex64, ComplexExt};
use crate::ndarray::NdArray;

/// A runtime value of one of the supported numeric categories.
///
/// The set is deliberately closed: every dispatch family enumerates its
/// supported combinations of these three kinds, and anything outside the
/// enumeration fails with [`crate::NumkError::UnmatchedDispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Real(f64),
    Complex(Complex64),
    Array(NdArray),
}

/// Type tag of a [`Value`], used for dispatch tracing and error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Real,
    Complex,
    Array,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Real => "real",
            ValueKind::Complex => "complex",
            ValueKind::Array => "array",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Real(_) => ValueKind::Real,
            Value::Complex(_) => ValueKind::Complex,
            Value::Array(_) => ValueKind::Array,
        }
    }

    /// The scalar payload as a complex number; `None` for arrays.
    pub fn to_complex(&self) -> Option<Complex64> {
        match self {
            Value::Real(r) => Some(c64(*r, 0.0)),
            Value::Complex(z) => Some(*z),
            Value::Array(_) => None,
        }
    }

    /// The real payload; `None` for complex and array values.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// The array payload; `None` for scalars.
    pub fn into_array(self) -> Option<NdArray> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl From<i32> for Value {
    fn from(r: i32) -> Self {
        Value::Real(f64::from(r))
    }
}

impl From<Complex64> for Value {
    fn from(z: Complex64) -> Self {
        Value::Complex(z)
    }
}

impl From<NdArray> for Value {
    fn from(a: NdArray) -> Self {
        Value::Array(a)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Real(r) => write!(f, "{r}"),
            Value::Complex(z) => f.write_str(&z.canonical()),
            Value::Array(a) => write!(f, "{a}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(Value::from(1.0).kind(), ValueKind::Real);
        assert_eq!(Value::from(c64(1.0, 1.0)).kind(), ValueKind::Complex);
        assert_eq!(Value::from(NdArray::zeros(&[2])).kind(), ValueKind::Array);
    }

    #[test]
    fn test_scalar_accessors() {
        assert_eq!(Value::from(2.0).to_complex(), Some(c64(2.0, 0.0)));
        assert_eq!(Value::from(2.0).as_real(), Some(2.0));
        assert_eq!(Value::from(c64(1.0, 2.0)).as_real(), None);
        assert!(Value::from(NdArray::zeros(&[2])).to_complex().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(3.0).to_string(), "3");
        assert_eq!(Value::from(c64(1.0, 2.0)).to_string(), "(1+2j)");
        assert_eq!(ValueKind::Array.to_string(), "array");
    }
}
