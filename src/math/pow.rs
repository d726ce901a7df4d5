//! Exponentiation in polar form.

use crate::complex::{c64, Complex64, ComplexExt};
use crate::math::angle::phase;
use crate::union_method;
use crate::{Value, E};

/// Real base, complex exponent.
fn pow_rc(x: f64, y: Complex64) -> Complex64 {
    let len = x.powf(y.re);
    let ph = y.im * x.log(E);
    c64(len * ph.cos(), len * ph.sin())
}

/// Complex base, real exponent.
fn pow_cr(x: Complex64, y: f64) -> Complex64 {
    let r = x.magnitude();
    let theta = phase(x);
    let len = r.powf(y);
    let ph = theta * y;
    c64(len * ph.cos(), len * ph.sin())
}

/// Complex base, complex exponent:
/// `r^y.re / E^(y.im * theta)` at phase `theta * y.re + y.im * log r`.
fn pow_cc(x: Complex64, y: Complex64) -> Complex64 {
    let r = x.magnitude();
    let theta = phase(x);
    let len = r.powf(y.re) / E.powf(y.im * theta);
    let ph = theta * y.re + y.im * r.log(E);
    c64(len * ph.cos(), len * ph.sin())
}

union_method! {
    /// `x` raised to `y` over the numeric union.
    pub fn nkpow(x, y) {
        (Value::Real(x), Value::Complex(y)) => Ok(Value::Complex(pow_rc(x, y))),
        (Value::Real(x), Value::Real(y)) => Ok(Value::Real(x.powf(y))),
        (Value::Complex(x), Value::Complex(y)) => Ok(Value::Complex(pow_cc(x, y))),
        (Value::Complex(x), Value::Real(y)) => Ok(Value::Complex(pow_cr(x, y))),
        (Value::Array(a), Value::Real(y)) => Ok(Value::Array(a.transform(|z| pow_cr(z, y)))),
        (Value::Array(a), Value::Complex(y)) => Ok(Value::Array(a.transform(|z| pow_cc(z, y)))),
    }
}
