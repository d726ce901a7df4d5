//! Complex-valued N-dimensional strided arrays with numeric union dispatch.
//!
//! This crate provides two pieces that fit together:
//!
//! - [`NdArray`]: an N-dimensional array of complex numbers backed by a pair
//!   of flat `f64` buffers (real and imaginary parts) shared between views.
//!   Slicing, axis views, transposition and broadcasting all produce new
//!   views over the same storage — data is only copied by [`NdArray::copy`],
//!   [`NdArray::reshape`] and the `transform` family.
//! - [`Value`] and the [`union_method!`] macro: a closed numeric union over
//!   `real | complex | array` together with a declarative way to define a
//!   function family once and dispatch it over the runtime kinds of its
//!   arguments, in declaration order, erroring on unhandled combinations.
//!
//! The math functions in [`math`] ([`nklog`], [`nkpow`], [`angle`],
//! [`nkabs`], ...) are dispatch families built on top of both.
//!
//! # Core Types
//!
//! - [`NdArray`]: shape / strides / offset view over shared storage
//! - [`Complex64`] (re-exported from `num-complex`) plus [`ComplexExt`]
//!   for checked division and remainder
//! - [`Value`] / [`ValueKind`]: the numeric union and its type tags
//! - [`AxisRange`]: per-axis `{first, last, step}` slicing specification
//!
//! # Example
//!
//! ```rust
//! use numk::{c64, nkpow, NdArray};
//!
//! let base = NdArray::of(&[1.0, 2.0, 4.0]);
//! let squared = nkpow(base, 2.0).unwrap().into_array().unwrap();
//! assert_eq!(squared.get(&[2]).unwrap(), c64(16.0, 0.0));
//! ```
//!
//! # Aliasing
//!
//! Views derived from the same root array share one backing store, and a
//! write through any view is visible through all of them. A broadcast view
//! maps several logical elements onto one physical position (stride 0);
//! the in-place transform family detects this and fails with
//! [`NumkError::AliasedWrite`] instead of silently writing the same
//! address repeatedly. The engine is single-threaded by construction
//! (`NdArray` is neither `Send` nor `Sync`); a concurrent host must wrap
//! its own locking around each backing store.

mod broadcast;
mod complex;
pub mod dispatch;
mod display;
pub mod math;
mod ndarray;
mod transform;
mod value;

pub use broadcast::{broadcast, broadcast_shape, broadcast_to};
pub use complex::{c64, Complex64, ComplexExt, IntoComplex};
pub use math::{
    angle, convolve, is_close, is_close_array, is_close_complex, nkabs, nklog, nklog_base, nkpow,
    ConvolveMode, Tolerance,
};
pub use ndarray::{AxisRange, NdArray};
pub use value::{Value, ValueKind};

/// Logarithm base used by [`nklog`] and the phase terms of [`nkpow`].
///
/// Everything log-shaped in this crate is expressed relative to this one
/// constant, so re-basing the library means changing a single number.
pub const E: f64 = std::f64::consts::E;

/// Errors reported by array, scalar and dispatch operations.
///
/// All failures are deterministic for a given input and none are retried;
/// precondition violations are reported to the caller instead of being
/// coerced into NaN/Inf results.
#[derive(Debug, thiserror::Error)]
pub enum NumkError {
    /// Multi-index has the wrong rank or a component outside the shape.
    #[error("index {index:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds { index: Vec<usize>, shape: Vec<usize> },

    /// Axis argument is not a valid axis for this rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// A slice range does not fit the axis it addresses.
    #[error("range {first}..={last} (step {step}) out of bounds for axis {axis} of size {size}")]
    InvalidRange {
        axis: usize,
        first: usize,
        last: usize,
        step: usize,
        size: usize,
    },

    /// Operand shapes must be identical but are not.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Element counts differ between the old and requested shape.
    #[error("cannot reshape {from:?} into {to:?}")]
    ReshapeMismatch { from: Vec<usize>, to: Vec<usize> },

    /// Shapes cannot be unified under the broadcasting rule.
    #[error("cannot broadcast shapes {0:?} and {1:?}")]
    BroadcastMismatch(Vec<usize>, Vec<usize>),

    /// In-place mutation on a view whose logical elements alias each other.
    #[error("in-place transform on an aliased (broadcast) view; copy first")]
    AliasedWrite,

    /// Mask arrays may only contain 0 and 1.
    #[error("invalid mask value {value} at {index:?}, expected 0 or 1")]
    InvalidMaskValue { value: Complex64, index: Vec<usize> },

    /// Toeplitz construction requires `column[0] == row[0]`.
    #[error("toeplitz column and row must agree on the first element")]
    ToeplitzSeedMismatch,

    /// Convolution inputs must be rank 1.
    #[error("convolution requires 1-D input, got rank {0}")]
    NotOneDimensional(usize),

    /// Convolution inputs must hold at least one element.
    #[error("convolution requires non-empty input")]
    EmptyConvolution,

    /// Unrecognized convolution mode string.
    #[error("unknown convolution mode `{0}`, expected one of `full`, `same`, `valid`")]
    UnknownConvolveMode(String),

    /// Division or remainder by a value of zero modulus.
    #[error("division by a value of zero modulus")]
    DivisionByZero,

    /// Remainder with a nonzero imaginary part on either operand.
    #[error("remainder is undefined for operands with nonzero imaginary part")]
    ComplexRemainder,

    /// No candidate of a dispatch family matches the argument kinds.
    #[error("no implementation of `{function}` matches argument types {kinds:?}")]
    UnmatchedDispatch {
        function: &'static str,
        kinds: Vec<ValueKind>,
    },
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, NumkError>;
