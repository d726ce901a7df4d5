//! Complex scalar support on top of `num-complex`.
//!
//! The element type everywhere in this crate is [`Complex64`]. This module
//! adds the pieces `num-complex` does not carry: checked division and
//! remainder that fail instead of producing NaN, relaxed equality against a
//! plain real, and the canonical short rendering used by [`crate::Value`].

use crate::{NumkError, Result};

pub use num_complex::Complex64;

/// Shorthand constructor, `c64(re, im)`.
#[inline]
pub fn c64(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Conversion into a complex scalar.
///
/// This is the crate's "real-or-complex" parameter idiom: constructors,
/// scalar operands and `transform` return values all accept anything
/// implementing it. A real converts to a complex with zero imaginary part.
pub trait IntoComplex: Copy {
    fn into_complex(self) -> Complex64;
}

impl IntoComplex for Complex64 {
    #[inline]
    fn into_complex(self) -> Complex64 {
        self
    }
}

impl IntoComplex for f64 {
    #[inline]
    fn into_complex(self) -> Complex64 {
        Complex64::new(self, 0.0)
    }
}

macro_rules! impl_into_complex_real {
    ($($t:ty),*) => {
        $(
            impl IntoComplex for $t {
                #[inline]
                fn into_complex(self) -> Complex64 {
                    Complex64::new(self as f64, 0.0)
                }
            }
        )*
    };
}

impl_into_complex_real!(f32, i8, i16, i32, i64, u8, u16, u32, u64, usize);

/// Checked arithmetic and scalar conveniences on [`Complex64`].
pub trait ComplexExt: Sized {
    /// Division by the conjugate-normalization formula.
    ///
    /// # Errors
    /// Fails with [`NumkError::DivisionByZero`] when the divisor has zero
    /// modulus.
    fn checked_div(self, rhs: Complex64) -> Result<Complex64>;

    /// Remainder of the real parts.
    ///
    /// Remainder is only defined when both operands have zero imaginary
    /// part; the result is `self.re % rhs.re` as a complex value.
    ///
    /// # Errors
    /// Fails with [`NumkError::ComplexRemainder`] when either imaginary
    /// part is nonzero, and with [`NumkError::DivisionByZero`] when the
    /// divisor is zero.
    fn checked_rem(self, rhs: Complex64) -> Result<Complex64>;

    /// Relaxed equality against a plain real: true iff the imaginary part
    /// is exactly zero and the real parts are equal.
    fn eq_real(self, x: f64) -> bool;

    /// Euclidean norm, `hypot(re, im)`.
    fn magnitude(self) -> f64;

    /// Magnitude-based integral coercion.
    fn to_i64(self) -> i64;

    /// Canonical short form: `"r"` when the imaginary part is zero,
    /// `"ij"` when the real part is zero, `"(r+ij)"` otherwise. Integral
    /// components render without a fractional part.
    fn canonical(self) -> String;
}

impl ComplexExt for Complex64 {
    fn checked_div(self, rhs: Complex64) -> Result<Complex64> {
        let denom = rhs.re * rhs.re + rhs.im * rhs.im;
        if denom == 0.0 {
            return Err(NumkError::DivisionByZero);
        }
        Ok(Complex64::new(
            (self.re * rhs.re + self.im * rhs.im) / denom,
            (self.im * rhs.re - self.re * rhs.im) / denom,
        ))
    }

    fn checked_rem(self, rhs: Complex64) -> Result<Complex64> {
        if self.im != 0.0 || rhs.im != 0.0 {
            return Err(NumkError::ComplexRemainder);
        }
        if rhs.re == 0.0 {
            return Err(NumkError::DivisionByZero);
        }
        Ok(Complex64::new(self.re % rhs.re, 0.0))
    }

    #[inline]
    fn eq_real(self, x: f64) -> bool {
        self.im == 0.0 && self.re == x
    }

    #[inline]
    fn magnitude(self) -> f64 {
        self.re.hypot(self.im)
    }

    #[inline]
    fn to_i64(self) -> i64 {
        self.magnitude() as i64
    }

    fn canonical(self) -> String {
        if self.im == 0.0 {
            format!("{}", self.re)
        } else if self.re == 0.0 {
            format!("{}j", self.im)
        } else if self.im < 0.0 {
            format!("({}-{}j)", self.re, -self.im)
        } else {
            format!("({}+{}j)", self.re, self.im)
        }
    }
}
