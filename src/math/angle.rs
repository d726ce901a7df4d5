//! Phase angle and magnitude.

use crate::complex::{Complex64, ComplexExt};
use crate::union_method;
use crate::Value;

/// Phase of a complex value, `atan2(im, re)`.
pub(crate) fn phase(z: Complex64) -> f64 {
    z.im.atan2(z.re)
}

union_method! {
    /// Phase angle in radians.
    ///
    /// A real argument is treated as a complex value with zero imaginary
    /// part, so `angle(x)` is `0` for `x >= 0` and `pi` for `x < 0` —
    /// the same convention the complex logarithm's phase term uses.
    pub fn angle(x) {
        (Value::Complex(z)) => Ok(Value::Real(phase(z))),
        (Value::Array(a)) => Ok(Value::Array(a.transform(|z| phase(z)))),
        (Value::Real(r)) => Ok(Value::Real(0f64.atan2(r))),
    }
}

union_method! {
    /// Magnitude: `|x|` for reals, the Euclidean norm for complex values,
    /// elementwise for arrays.
    pub fn nkabs(x) {
        (Value::Real(r)) => Ok(Value::Real(r.abs())),
        (Value::Complex(z)) => Ok(Value::Real(z.magnitude())),
        (Value::Array(a)) => Ok(Value::Array(a.transform(|z| z.magnitude()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{c64, NdArray};
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_angle_complex() {
        let a = angle(c64(0.0, 1.0)).unwrap().as_real().unwrap();
        assert_relative_eq!(a, FRAC_PI_2, epsilon = 1e-12);
        let b = angle(c64(1.0, 1.0)).unwrap().as_real().unwrap();
        assert_relative_eq!(b, PI / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_real_matches_zero_imaginary() {
        assert_eq!(angle(3.0).unwrap().as_real().unwrap(), 0.0);
        let neg = angle(-3.0).unwrap().as_real().unwrap();
        assert_relative_eq!(neg, PI, epsilon = 1e-12);
        assert_eq!(
            angle(3.0).unwrap(),
            angle(c64(3.0, 0.0)).unwrap()
        );
    }

    #[test]
    fn test_nkabs() {
        assert_eq!(nkabs(-2.5).unwrap(), Value::Real(2.5));
        assert_eq!(nkabs(c64(3.0, 4.0)).unwrap(), Value::Real(5.0));
        let a = NdArray::of(&[c64(3.0, 4.0), c64(-1.0, 0.0)]);
        let m = nkabs(a).unwrap().into_array().unwrap();
        assert_eq!(m, NdArray::of(&[5.0, 1.0]));
    }
}
