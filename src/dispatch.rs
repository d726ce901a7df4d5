//! Declaration-ordered dispatch over the numeric union.
//!
//! A function family is declared once with [`crate::union_method!`]: a
//! name, a positional argument list, and an ordered list of candidates.
//! Each candidate is a tuple pattern over [`crate::Value`] variants; the
//! positions whose pattern names a concrete variant are the candidate's
//! discriminating parameters. The macro expands to a single entry point
//! that
//!
//! 1. converts every argument into a [`crate::Value`],
//! 2. tries the candidates in declaration order and invokes the first one
//!    whose discriminating parameters match the actual argument kinds,
//! 3. coerces the chosen candidate's result into a [`crate::Value`], and
//! 4. fails with [`crate::NumkError::UnmatchedDispatch`] — naming the
//!    family and the actual argument kinds — when no candidate matches.
//!
//! Resolution is deterministic, order-preserving, and total-or-erroring:
//! a combination outside the declared set can never silently fall through
//! to a wrong candidate. Set `NUMK_TRACE=1` to print every resolution.
//!
//! ```rust
//! use numk::{union_method, Value};
//!
//! union_method! {
//!     /// Unit step, extended over the union.
//!     pub fn step(x) {
//!         (Value::Real(r)) => Ok(Value::Real(if r >= 0.0 { 1.0 } else { 0.0 })),
//!         (Value::Array(a)) => Ok(Value::Array(a.mask(|z| z.re >= 0.0))),
//!     }
//! }
//!
//! assert_eq!(step(-2.0).unwrap(), Value::Real(0.0));
//! assert!(step(numk::c64(0.0, 1.0)).is_err());
//! ```

use crate::ValueKind;

#[inline]
fn trace_enabled() -> bool {
    matches!(std::env::var("NUMK_TRACE"), Ok(ref v) if v == "1")
}

/// Called by the expansion of [`crate::union_method!`] before matching.
#[doc(hidden)]
pub fn trace_resolution(function: &str, kinds: &[ValueKind]) {
    if trace_enabled() {
        eprintln!("numk dispatch: {function}{kinds:?}");
    }
}

/// Declare a dispatch family over the numeric union.
///
/// See the [module documentation](crate::dispatch) for the resolution
/// contract. Candidate bodies evaluate to `Result<Value>`, so fallible
/// kernels propagate their own errors through the entry point.
#[macro_export]
macro_rules! union_method {
    (
        $(#[$meta:meta])*
        $vis:vis fn $name:ident($($arg:ident),+ $(,)?) {
            $( ($($pat:pat),+ $(,)?) => $body:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis fn $name($($arg: impl ::core::convert::Into<$crate::Value>),+) -> $crate::Result<$crate::Value> {
            $(let $arg: $crate::Value = $arg.into();)+
            let kinds = [$($arg.kind()),+];
            $crate::dispatch::trace_resolution(stringify!($name), &kinds);
            #[allow(unreachable_patterns)]
            let resolved = match ($($arg,)+) {
                $( ($($pat,)+) => $body, )+
                _ => Err($crate::NumkError::UnmatchedDispatch {
                    function: stringify!($name),
                    kinds: kinds.to_vec(),
                }),
            };
            resolved
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{c64, NdArray, NumkError, Value, ValueKind};

    union_method! {
        fn pick(x) {
            (Value::Real(_)) => Ok(Value::Real(1.0)),
            (Value::Real(_)) => Ok(Value::Real(2.0)),
            (Value::Complex(_)) => Ok(Value::Real(3.0)),
        }
    }

    union_method! {
        fn mix(x, y) {
            (Value::Real(a), Value::Real(b)) => Ok(Value::Real(a + b)),
            (Value::Real(a), Value::Complex(b)) => Ok(Value::Complex(c64(a, 0.0) + b)),
        }
    }

    #[test]
    fn test_first_candidate_wins() {
        assert_eq!(pick(5.0).unwrap(), Value::Real(1.0));
        assert_eq!(pick(c64(0.0, 1.0)).unwrap(), Value::Real(3.0));
    }

    #[test]
    fn test_unmatched_names_function_and_kinds() {
        let err = pick(NdArray::zeros(&[2])).unwrap_err();
        match err {
            NumkError::UnmatchedDispatch { function, kinds } => {
                assert_eq!(function, "pick");
                assert_eq!(kinds, vec![ValueKind::Array]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_binary_resolution() {
        assert_eq!(mix(1.0, 2.0).unwrap(), Value::Real(3.0));
        assert_eq!(
            mix(1.0, c64(0.0, 1.0)).unwrap(),
            Value::Complex(c64(1.0, 1.0))
        );
        assert!(matches!(
            mix(c64(0.0, 1.0), 2.0),
            Err(NumkError::UnmatchedDispatch { function: "mix", .. })
        ));
    }
}
