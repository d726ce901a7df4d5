//! Shape unification under the broadcasting rule.
//!
//! Shapes align from the trailing axis; the shorter shape is padded with
//! leading size-1 axes; two axes are compatible when they are equal or
//! either is 1, and the unified shape takes the per-axis maximum. A size-1
//! axis expanded to size N becomes a stride-0 axis of the view — the data
//! is never duplicated.

use crate::ndarray::NdArray;
use crate::{NumkError, Result};

/// Unified shape of `a` and `b`, or `None` when an axis pair is
/// incompatible.
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    if a == b {
        return Some(a.to_vec());
    }
    let rank = a.len().max(b.len());
    let mut out = Vec::with_capacity(rank);
    for axis in 0..rank {
        // Leading padding reads as size 1.
        let da = if axis + a.len() < rank {
            1
        } else {
            a[axis + a.len() - rank]
        };
        let db = if axis + b.len() < rank {
            1
        } else {
            b[axis + b.len() - rank]
        };
        if da == db || da == 1 || db == 1 {
            out.push(da.max(db));
        } else {
            return None;
        }
    }
    Some(out)
}

/// Views of both arrays on their unified shape.
///
/// # Errors
/// Fails with [`NumkError::BroadcastMismatch`] when the shapes cannot be
/// unified.
pub fn broadcast(a: &NdArray, b: &NdArray) -> Result<(NdArray, NdArray)> {
    let target = broadcast_shape(a.shape(), b.shape())
        .ok_or_else(|| NumkError::BroadcastMismatch(a.shape().to_vec(), b.shape().to_vec()))?;
    Ok((a.broadcast_to(&target)?, b.broadcast_to(&target)?))
}

/// View of `a` expanded to exactly `shape`.
///
/// # Errors
/// Fails with [`NumkError::BroadcastMismatch`] when `a` cannot be
/// expanded to `shape` (including when unification would exceed it).
pub fn broadcast_to(a: &NdArray, shape: &[usize]) -> Result<NdArray> {
    match broadcast_shape(a.shape(), shape) {
        Some(target) if target == shape => a.broadcast_to(shape),
        _ => Err(NumkError::BroadcastMismatch(
            a.shape().to_vec(),
            shape.to_vec(),
        )),
    }
}
