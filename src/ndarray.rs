//! The strided array engine: shape, strides, offset, shared storage.
//!
//! An [`NdArray`] is a view over a rectangular N-dimensional grid of
//! complex values. The backing store is a pair of flat `f64` buffers
//! (real and imaginary parts) behind a reference count; every view derived
//! from the same root — by slicing, [`NdArray::view`],
//! [`NdArray::transposed`] or broadcasting — shares that store without
//! copying. The linear position of multi-index `idx` is
//! `offset + Σ idx[a] * strides[a]`, and every constructor and view
//! adapter keeps that position inside both buffers.

use std::cell::RefCell;
use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::rc::Rc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::complex::{c64, Complex64, IntoComplex};
use crate::{NumkError, Result};

#[derive(Debug)]
pub(crate) struct Storage {
    pub(crate) re: Vec<f64>,
    pub(crate) im: Vec<f64>,
}

/// An N-dimensional array of complex values over shared storage.
///
/// Cloning is cheap and yields another view of the same storage; use
/// [`NdArray::copy`] for an independent array. Mutation through any view
/// is visible through every aliasing view. The type is intentionally
/// neither `Send` nor `Sync`.
#[derive(Debug, Clone)]
pub struct NdArray {
    pub(crate) shape: Vec<usize>,
    pub(crate) strides: Vec<usize>,
    pub(crate) offset: usize,
    pub(crate) store: Rc<RefCell<Storage>>,
}

/// Row-major strides for a dense layout of `shape`.
pub(crate) fn dense_strides(shape: &[usize]) -> Vec<usize> {
    let rank = shape.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1usize; rank];
    for axis in (0..rank - 1).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

/// Inclusive per-axis slice specification: `first..=last` by `step`.
///
/// The sliced view covers `first..=last` advancing by `step`, so its
/// extent is `ceil((last - first + 1) / step)`, its stride
/// `stride * step`, and its origin advanced by `first * stride`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub first: usize,
    pub last: usize,
    pub step: usize,
}

impl AxisRange {
    pub fn new(first: usize, last: usize) -> Self {
        Self {
            first,
            last,
            step: 1,
        }
    }

    pub fn with_step(first: usize, last: usize, step: usize) -> Self {
        Self { first, last, step }
    }
}

impl From<RangeInclusive<usize>> for AxisRange {
    fn from(r: RangeInclusive<usize>) -> Self {
        let (first, last) = r.into_inner();
        Self::new(first, last)
    }
}

impl NdArray {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub(crate) fn from_parts(shape: Vec<usize>, re: Vec<f64>, im: Vec<f64>) -> Self {
        let strides = dense_strides(&shape);
        Self {
            shape,
            strides,
            offset: 0,
            store: Rc::new(RefCell::new(Storage { re, im })),
        }
    }

    /// Dense array whose logical element `i` (row-major flat index) is
    /// `f(i)`.
    pub fn from_shape_fn<R: IntoComplex>(shape: &[usize], mut f: impl FnMut(usize) -> R) -> Self {
        let numel: usize = shape.iter().product();
        let mut re = Vec::with_capacity(numel);
        let mut im = Vec::with_capacity(numel);
        for i in 0..numel {
            let z = f(i).into_complex();
            re.push(z.re);
            im.push(z.im);
        }
        Self::from_parts(shape.to_vec(), re, im)
    }

    /// Array of the given shape filled with zeros.
    pub fn zeros(shape: &[usize]) -> Self {
        Self::from_shape_fn(shape, |_| 0.0)
    }

    /// Array of the given shape filled with ones.
    pub fn ones(shape: &[usize]) -> Self {
        Self::from_shape_fn(shape, |_| 1.0)
    }

    /// The `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        Self::from_shape_fn(&[n, n], |i| if i % (n + 1) == 0 { 1.0 } else { 0.0 })
    }

    /// Rank-1 array holding `values` in order.
    pub fn of<V: IntoComplex>(values: &[V]) -> Self {
        Self::from_shape_fn(&[values.len()], |i| values[i])
    }

    /// Toeplitz matrix from its first column and first row.
    ///
    /// Row 0 is the row argument, column 0 the column argument, and every
    /// other cell equals its upper-left neighbor.
    ///
    /// # Errors
    /// Fails with [`NumkError::ToeplitzSeedMismatch`] unless both
    /// sequences are non-empty and agree on their first element.
    pub fn toeplitz<C: IntoComplex, R: IntoComplex>(column: &[C], row: &[R]) -> Result<Self> {
        let column: Vec<Complex64> = column.iter().map(|&x| x.into_complex()).collect();
        let row: Vec<Complex64> = row.iter().map(|&x| x.into_complex()).collect();
        match (column.first(), row.first()) {
            (Some(c0), Some(r0)) if c0 == r0 => {}
            _ => return Err(NumkError::ToeplitzSeedMismatch),
        }
        let cols = row.len();
        Ok(Self::from_shape_fn(&[column.len(), cols], |flat| {
            let i = flat / cols;
            let j = flat % cols;
            if i <= j {
                row[j - i]
            } else {
                column[i - j]
            }
        }))
    }

    /// Array of uniform `[0, 1)` doubles.
    ///
    /// A seeded stream is deterministic; without a seed the generator is
    /// seeded from the OS.
    pub fn random(seed: Option<u64>, shape: &[usize]) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self::from_shape_fn(shape, |_| rng.gen::<f64>())
    }

    /// Array of standard-normal doubles, seeded like [`NdArray::random`].
    pub fn random_normal(seed: Option<u64>, shape: &[usize]) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self::from_shape_fn(shape, |_| rng.sample::<f64, _>(StandardNormal))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of logical elements.
    #[inline]
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    // ------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------

    /// Linear storage position of a multi-index.
    pub(crate) fn position(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.rank() {
            return Err(NumkError::IndexOutOfBounds {
                index: index.to_vec(),
                shape: self.shape.clone(),
            });
        }
        let mut pos = self.offset;
        for (axis, (&i, &dim)) in index.iter().zip(&self.shape).enumerate() {
            if i >= dim {
                return Err(NumkError::IndexOutOfBounds {
                    index: index.to_vec(),
                    shape: self.shape.clone(),
                });
            }
            pos += i * self.strides[axis];
        }
        Ok(pos)
    }

    /// Element at the given multi-index.
    ///
    /// # Errors
    /// Fails when the index count does not equal the rank or any component
    /// is outside its axis.
    pub fn get(&self, index: &[usize]) -> Result<Complex64> {
        let pos = self.position(index)?;
        let s = self.store.borrow();
        Ok(c64(s.re[pos], s.im[pos]))
    }

    /// Overwrite the element at the given multi-index.
    ///
    /// The write is visible through every view sharing this storage.
    pub fn set<V: IntoComplex>(&mut self, index: &[usize], value: V) -> Result<()> {
        let pos = self.position(index)?;
        let z = value.into_complex();
        let mut s = self.store.borrow_mut();
        s.re[pos] = z.re;
        s.im[pos] = z.im;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Slice by per-axis ranges; trailing axes without a range are kept
    /// whole. Returns a view over the same storage, never a copy.
    pub fn slice(&self, ranges: &[AxisRange]) -> Result<Self> {
        if ranges.len() > self.rank() {
            return Err(NumkError::InvalidAxis {
                axis: ranges.len() - 1,
                rank: self.rank(),
            });
        }
        let mut shape = self.shape.clone();
        let mut strides = self.strides.clone();
        let mut offset = self.offset;
        for (axis, r) in ranges.iter().enumerate() {
            if r.step == 0 || r.last < r.first || r.last >= self.shape[axis] {
                return Err(NumkError::InvalidRange {
                    axis,
                    first: r.first,
                    last: r.last,
                    step: r.step,
                    size: self.shape[axis],
                });
            }
            shape[axis] = (r.last - r.first + 1).div_ceil(r.step);
            strides[axis] = self.strides[axis] * r.step;
            offset += r.first * self.strides[axis];
        }
        Ok(Self {
            shape,
            strides,
            offset,
            store: Rc::clone(&self.store),
        })
    }

    /// Drop one axis, fixing it at `index`. Returns a view.
    pub fn view(&self, index: usize, axis: usize) -> Result<Self> {
        if axis >= self.rank() {
            return Err(NumkError::InvalidAxis {
                axis,
                rank: self.rank(),
            });
        }
        if index >= self.shape[axis] {
            return Err(NumkError::IndexOutOfBounds {
                index: vec![index],
                shape: self.shape.clone(),
            });
        }
        let mut shape = self.shape.clone();
        let mut strides = self.strides.clone();
        let offset = self.offset + index * strides[axis];
        shape.remove(axis);
        strides.remove(axis);
        Ok(Self {
            shape,
            strides,
            offset,
            store: Rc::clone(&self.store),
        })
    }

    /// View with shape and strides reversed.
    pub fn transposed(&self) -> Self {
        let mut shape = self.shape.clone();
        let mut strides = self.strides.clone();
        shape.reverse();
        strides.reverse();
        Self {
            shape,
            strides,
            offset: self.offset,
            store: Rc::clone(&self.store),
        }
    }

    /// Freshly materialized array with a new shape and the same logical
    /// element order.
    ///
    /// Arbitrary stride patterns cannot always be reinterpreted in place,
    /// so this always copies into a dense row-major store.
    ///
    /// # Errors
    /// Fails with [`NumkError::ReshapeMismatch`] when the element counts
    /// differ.
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        let numel: usize = shape.iter().product();
        if numel != self.numel() {
            return Err(NumkError::ReshapeMismatch {
                from: self.shape.clone(),
                to: shape.to_vec(),
            });
        }
        let mut out = self.copy();
        out.shape = shape.to_vec();
        out.strides = dense_strides(shape);
        Ok(out)
    }

    /// View of this array expanded to `shape` under the broadcasting rule.
    ///
    /// Padded and expanded axes get stride 0, so no data is duplicated.
    /// Writing through a broadcast view would land repeatedly on the same
    /// positions; the in-place transforms reject such views.
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self> {
        if self.shape == shape {
            return Ok(self.clone());
        }
        if shape.len() < self.rank() {
            return Err(NumkError::BroadcastMismatch(
                self.shape.clone(),
                shape.to_vec(),
            ));
        }
        let pad = shape.len() - self.rank();
        let mut strides = vec![0usize; shape.len()];
        for (axis, &dim) in shape.iter().enumerate() {
            if axis < pad {
                continue;
            }
            let own = axis - pad;
            if self.shape[own] == dim {
                strides[axis] = self.strides[own];
            } else if self.shape[own] != 1 {
                return Err(NumkError::BroadcastMismatch(
                    self.shape.clone(),
                    shape.to_vec(),
                ));
            }
        }
        Ok(Self {
            shape: shape.to_vec(),
            strides,
            offset: self.offset,
            store: Rc::clone(&self.store),
        })
    }

    // ------------------------------------------------------------------
    // Iteration
    // ------------------------------------------------------------------

    pub(crate) fn positions(&self) -> Positions {
        Positions::new(self)
    }

    pub(crate) fn indexed_positions(&self) -> IndexedPositions {
        IndexedPositions::new(self)
    }

    /// Logical elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Complex64> + '_ {
        let store = Rc::clone(&self.store);
        self.positions().map(move |pos| {
            let s = store.borrow();
            c64(s.re[pos], s.im[pos])
        })
    }

    /// Whether distinct logical elements share a physical position.
    ///
    /// True for broadcast views (stride 0 on an expanded axis) and any
    /// other stride pattern that folds the index set onto itself.
    pub fn has_aliases(&self) -> bool {
        let numel = self.numel();
        if self
            .shape
            .iter()
            .zip(&self.strides)
            .any(|(&dim, &stride)| dim > 1 && stride == 0)
        {
            return true;
        }
        let distinct: HashSet<usize> = self.positions().collect();
        distinct.len() != numel
    }

    pub(crate) fn ensure_unaliased(&self) -> Result<()> {
        if self.has_aliases() {
            Err(NumkError::AliasedWrite)
        } else {
            Ok(())
        }
    }
}

impl PartialEq for NdArray {
    fn eq(&self, other: &Self) -> bool {
        if self.shape != other.shape {
            return false;
        }
        let a = self.store.borrow();
        let b = other.store.borrow();
        self.positions()
            .zip(other.positions())
            .all(|(p, q)| a.re[p] == b.re[q] && a.im[p] == b.im[q])
    }
}

/// Row-major odometer over the linear storage positions of a view.
pub(crate) struct Positions {
    shape: Vec<usize>,
    strides: Vec<usize>,
    index: Vec<usize>,
    pos: usize,
    remaining: usize,
}

impl Positions {
    fn new(a: &NdArray) -> Self {
        Self {
            shape: a.shape.clone(),
            strides: a.strides.clone(),
            index: vec![0; a.rank()],
            pos: a.offset,
            remaining: a.numel(),
        }
    }

    fn advance(&mut self) {
        for axis in (0..self.shape.len()).rev() {
            self.index[axis] += 1;
            self.pos += self.strides[axis];
            if self.index[axis] < self.shape[axis] {
                return;
            }
            self.pos -= self.index[axis] * self.strides[axis];
            self.index[axis] = 0;
        }
    }
}

impl Iterator for Positions {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.pos;
        self.remaining -= 1;
        self.advance();
        Some(current)
    }
}

/// [`Positions`] that also yields the multi-index of each element.
pub(crate) struct IndexedPositions {
    inner: Positions,
}

impl IndexedPositions {
    fn new(a: &NdArray) -> Self {
        Self {
            inner: Positions::new(a),
        }
    }
}

impl Iterator for IndexedPositions {
    type Item = (Vec<usize>, usize);

    fn next(&mut self) -> Option<(Vec<usize>, usize)> {
        if self.inner.remaining == 0 {
            return None;
        }
        let index = self.inner.index.clone();
        let pos = self.inner.pos;
        self.inner.remaining -= 1;
        self.inner.advance();
        Some((index, pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_strides() {
        assert_eq!(dense_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(dense_strides(&[5]), vec![1]);
        assert_eq!(dense_strides(&[]), Vec::<usize>::new());
    }

    #[test]
    fn test_zeros_shape_and_content() {
        let a = NdArray::zeros(&[2, 3, 4]);
        assert_eq!(a.shape(), &[2, 3, 4]);
        assert_eq!(a.strides(), &[12, 4, 1]);
        assert_eq!(a.numel(), 24);
        assert!(a.all(|z| z == c64(0.0, 0.0)));
    }

    #[test]
    fn test_get_set_bounds() {
        let mut a = NdArray::from_shape_fn(&[2, 3], |i| i as f64);
        assert_eq!(a.get(&[1, 2]).unwrap(), c64(5.0, 0.0));
        a.set(&[0, 1], c64(0.0, 2.0)).unwrap();
        assert_eq!(a.get(&[0, 1]).unwrap(), c64(0.0, 2.0));
        assert!(a.get(&[2, 0]).is_err());
        assert!(a.get(&[0]).is_err());
        assert!(a.set(&[0, 3], 1.0).is_err());
    }

    #[test]
    fn test_identity() {
        let a = NdArray::identity(3);
        for i in 0..3 {
            for j in 0..3 {
                let want = if i == j { 1.0 } else { 0.0 };
                assert_eq!(a.get(&[i, j]).unwrap(), c64(want, 0.0));
            }
        }
    }

    #[test]
    fn test_of() {
        let a = NdArray::of(&[1.0, 2.5, 3.0]);
        assert_eq!(a.shape(), &[3]);
        assert_eq!(a.get(&[1]).unwrap(), c64(2.5, 0.0));
    }

    #[test]
    fn test_toeplitz_fixture() {
        let c = [
            c64(1.0, 0.0),
            c64(2.0, 0.0),
            c64(3.0, 0.0),
            c64(4.0, 0.0),
        ];
        let r = [
            c64(1.0, 0.0),
            c64(1.0, 1.0),
            c64(1.0, 2.0),
            c64(1.0, 3.0),
        ];
        let t = NdArray::toeplitz(&c, &r).unwrap();
        for j in 0..4 {
            assert_eq!(t.get(&[0, j]).unwrap(), r[j]);
        }
        for i in 0..4 {
            assert_eq!(t.get(&[i, 0]).unwrap(), c[i]);
        }
        for i in 1..4 {
            for j in 1..4 {
                assert_eq!(t.get(&[i, j]).unwrap(), t.get(&[i - 1, j - 1]).unwrap());
            }
        }
    }

    #[test]
    fn test_toeplitz_seed_mismatch() {
        let r = NdArray::toeplitz(&[1.0, 2.0], &[9.0, 1.0]);
        assert!(matches!(r, Err(NumkError::ToeplitzSeedMismatch)));
    }

    #[test]
    fn test_random_seeded_deterministic() {
        let a = NdArray::random(Some(42), &[3, 3]);
        let b = NdArray::random(Some(42), &[3, 3]);
        let c = NdArray::random(Some(43), &[3, 3]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.all(|z| z.im == 0.0 && (0.0..1.0).contains(&z.re)));
    }

    #[test]
    fn test_slice_fixture() {
        // a[1..=2, 1..=2] of a 4x4 counting matrix selects 5, 6, 9, 10.
        let a = NdArray::from_shape_fn(&[4, 4], |i| i as f64);
        let v = a.slice(&[(1..=2).into(), (1..=2).into()]).unwrap();
        assert_eq!(v.shape(), &[2, 2]);
        let expected = NdArray::of(&[5.0, 6.0, 9.0, 10.0]).reshape(&[2, 2]).unwrap();
        assert_eq!(v, expected);
    }

    #[test]
    fn test_slice_never_copies() {
        let a = NdArray::from_shape_fn(&[4, 4], |i| i as f64);
        let mut v = a.slice(&[(1..=2).into(), (1..=2).into()]).unwrap();
        v.set(&[0, 0], -1.0).unwrap();
        assert_eq!(a.get(&[1, 1]).unwrap(), c64(-1.0, 0.0));
    }

    #[test]
    fn test_slice_bounds() {
        let a = NdArray::zeros(&[3, 3]);
        assert!(a.slice(&[(0..=3).into()]).is_err());
        assert!(a.slice(&[AxisRange::with_step(0, 2, 0)]).is_err());
        assert!(a
            .slice(&[(0..=1).into(), (0..=1).into(), (0..=1).into()])
            .is_err());
    }

    #[test]
    fn test_view_aliases_parent() {
        let a = NdArray::from_shape_fn(&[2, 3], |i| i as f64);
        let mut row = a.view(1, 0).unwrap();
        assert_eq!(row.shape(), &[3]);
        assert_eq!(row.get(&[0]).unwrap(), c64(3.0, 0.0));
        row.set(&[2], 99.0).unwrap();
        assert_eq!(a.get(&[1, 2]).unwrap(), c64(99.0, 0.0));
    }

    #[test]
    fn test_view_bounds() {
        let a = NdArray::zeros(&[2, 3]);
        assert!(a.view(0, 2).is_err());
        assert!(a.view(3, 1).is_err());
    }

    #[test]
    fn test_transposed() {
        let a = NdArray::from_shape_fn(&[2, 3], |i| i as f64);
        let t = a.transposed();
        assert_eq!(t.shape(), &[3, 2]);
        assert_eq!(t.strides(), &[1, 3]);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(t.get(&[j, i]).unwrap(), a.get(&[i, j]).unwrap());
            }
        }
    }

    #[test]
    fn test_reshape_roundtrip() {
        let a = NdArray::from_shape_fn(&[2, 3, 4], |i| c64(i as f64, -(i as f64)));
        let b = a.reshape(&[4, 6]).unwrap();
        assert_eq!(b.reshape(a.shape()).unwrap(), a);
    }

    #[test]
    fn test_reshape_mismatch() {
        let a = NdArray::zeros(&[2, 3]);
        assert!(matches!(
            a.reshape(&[4]),
            Err(NumkError::ReshapeMismatch { .. })
        ));
    }

    #[test]
    fn test_broadcast_to_stride_zero() {
        let a = NdArray::of(&[1.0, 2.0, 3.0]);
        let b = a.broadcast_to(&[2, 3]).unwrap();
        assert_eq!(b.shape(), &[2, 3]);
        assert_eq!(b.strides(), &[0, 1]);
        assert_eq!(b.get(&[0, 1]).unwrap(), b.get(&[1, 1]).unwrap());
        assert!(b.has_aliases());
        assert!(!a.has_aliases());
    }

    #[test]
    fn test_broadcast_to_incompatible() {
        let a = NdArray::zeros(&[2, 3]);
        assert!(a.broadcast_to(&[4, 5]).is_err());
        assert!(a.broadcast_to(&[3]).is_err());
    }

    #[test]
    fn test_equality_across_layouts() {
        // A transposed view equals its dense copy elementwise.
        let a = NdArray::from_shape_fn(&[2, 3], |i| i as f64);
        let t = a.transposed();
        assert_eq!(t, t.copy());
        assert_ne!(a, t.copy());
    }

    #[test]
    fn test_positions_cover_view() {
        let a = NdArray::from_shape_fn(&[4, 4], |i| i as f64);
        let v = a.slice(&[(1..=2).into(), (1..=2).into()]).unwrap();
        let positions: Vec<usize> = v.positions().collect();
        assert_eq!(positions, vec![5, 6, 9, 10]);
    }
}
