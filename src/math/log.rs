//! Logarithms relative to the crate base [`crate::E`].

use crate::complex::{c64, Complex64, ComplexExt};
use crate::math::angle::phase;
use crate::union_method;
use crate::{Value, E};

/// `log(|z|) + i * angle(z)`, the complex logarithm consistent with
/// [`crate::angle`].
pub(crate) fn log_complex(z: Complex64) -> Complex64 {
    c64(z.magnitude().log(E), phase(z))
}

union_method! {
    /// Logarithm to base [`crate::E`].
    pub fn nklog(x) {
        (Value::Real(r)) => Ok(Value::Real(r.log(E))),
        (Value::Complex(z)) => Ok(Value::Complex(log_complex(z))),
        (Value::Array(a)) => Ok(Value::Array(a.transform(log_complex))),
    }
}

union_method! {
    /// Logarithm to an arbitrary base, `nklog(x) / nklog(base)`.
    ///
    /// Only real bases are supported for complex and array arguments;
    /// those combinations with a complex base fail with the unmatched
    /// dispatch error.
    pub fn nklog_base(x, base) {
        (Value::Real(r), Value::Complex(b)) => {
            c64(r.log(E), 0.0).checked_div(log_complex(b)).map(Value::Complex)
        },
        (Value::Real(r), Value::Real(b)) => Ok(Value::Real(r.log(b))),
        (Value::Complex(z), Value::Real(b)) => {
            log_complex(z).checked_div(c64(b.log(E), 0.0)).map(Value::Complex)
        },
        (Value::Array(a), Value::Real(b)) => {
            let denom = c64(b.log(E), 0.0);
            a.try_transform(|z| log_complex(z).checked_div(denom)).map(Value::Array)
        },
    }
}
