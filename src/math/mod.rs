//! Elementwise math over the numeric union.
//!
//! The functions here come in two styles, mirroring their shapes:
//!
//! - dispatch families declared with [`crate::union_method!`] ([`angle`],
//!   [`nkabs`], [`nklog`], [`nklog_base`], [`nkpow`]), accepting any
//!   [`crate::Value`]-convertible argument and resolving per argument
//!   kind;
//! - plain functions with fixed signatures ([`convolve`], [`is_close`]
//!   and friends).

mod angle;
mod comparison;
mod convolve;
mod log;
mod pow;

pub use angle::{angle, nkabs};
pub use comparison::{is_close, is_close_array, is_close_complex, Tolerance};
pub use convolve::{convolve, ConvolveMode};
pub use log::{nklog, nklog_base};
pub use pow::nkpow;
