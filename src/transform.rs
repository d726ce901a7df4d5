//! Elementwise transforms, scalar and array operators, masks and
//! reductions for [`NdArray`].
//!
//! Copying transforms materialize a fresh dense store and therefore work
//! on any view, broadcast ones included. In-place transforms write through
//! the shared store and refuse views whose logical elements alias each
//! other, since repeated writes to one physical position would corrupt the
//! data for every sharing view.

use crate::broadcast::broadcast;
use crate::complex::{c64, Complex64, ComplexExt, IntoComplex};
use crate::ndarray::NdArray;
use crate::{NumkError, Result};

impl NdArray {
    // ------------------------------------------------------------------
    // Copying transforms
    // ------------------------------------------------------------------

    /// Fully independent dense copy in row-major layout, preserving the
    /// logical element order.
    pub fn copy(&self) -> Self {
        let s = self.store.borrow();
        let mut re = Vec::with_capacity(self.numel());
        let mut im = Vec::with_capacity(self.numel());
        for pos in self.positions() {
            re.push(s.re[pos]);
            im.push(s.im[pos]);
        }
        Self::from_parts(self.shape.clone(), re, im)
    }

    /// New array with `f` applied to every logical element.
    pub fn transform<R: IntoComplex>(&self, mut f: impl FnMut(Complex64) -> R) -> Self {
        let s = self.store.borrow();
        let mut re = Vec::with_capacity(self.numel());
        let mut im = Vec::with_capacity(self.numel());
        for pos in self.positions() {
            let z = f(c64(s.re[pos], s.im[pos])).into_complex();
            re.push(z.re);
            im.push(z.im);
        }
        Self::from_parts(self.shape.clone(), re, im)
    }

    /// [`NdArray::transform`] with a fallible element function.
    pub fn try_transform<R: IntoComplex>(
        &self,
        mut f: impl FnMut(Complex64) -> Result<R>,
    ) -> Result<Self> {
        let s = self.store.borrow();
        let mut re = Vec::with_capacity(self.numel());
        let mut im = Vec::with_capacity(self.numel());
        for pos in self.positions() {
            let z = f(c64(s.re[pos], s.im[pos]))?.into_complex();
            re.push(z.re);
            im.push(z.im);
        }
        Ok(Self::from_parts(self.shape.clone(), re, im))
    }

    /// New array with `f` applied to every element and its multi-index.
    pub fn transform_indexed<R: IntoComplex>(
        &self,
        mut f: impl FnMut(&[usize], Complex64) -> R,
    ) -> Self {
        let s = self.store.borrow();
        let mut re = Vec::with_capacity(self.numel());
        let mut im = Vec::with_capacity(self.numel());
        for (index, pos) in self.indexed_positions() {
            let z = f(&index, c64(s.re[pos], s.im[pos])).into_complex();
            re.push(z.re);
            im.push(z.im);
        }
        Self::from_parts(self.shape.clone(), re, im)
    }

    // ------------------------------------------------------------------
    // In-place transforms
    // ------------------------------------------------------------------

    /// Apply `f` to every element through the shared store.
    ///
    /// # Errors
    /// Fails with [`NumkError::AliasedWrite`] on a view whose logical
    /// elements share physical positions (a broadcast view).
    pub fn transform_in_place<R: IntoComplex>(
        &mut self,
        mut f: impl FnMut(Complex64) -> R,
    ) -> Result<()> {
        self.try_transform_in_place(|z| Ok(f(z)))
    }

    /// [`NdArray::transform_in_place`] with a fallible element function.
    ///
    /// Elements already visited keep their new values when `f` fails
    /// midway; the aliasing check itself runs before any write.
    pub fn try_transform_in_place<R: IntoComplex>(
        &mut self,
        mut f: impl FnMut(Complex64) -> Result<R>,
    ) -> Result<()> {
        self.ensure_unaliased()?;
        let positions: Vec<usize> = self.positions().collect();
        let mut s = self.store.borrow_mut();
        for pos in positions {
            let z = f(c64(s.re[pos], s.im[pos]))?.into_complex();
            s.re[pos] = z.re;
            s.im[pos] = z.im;
        }
        Ok(())
    }

    /// Apply `f` with the multi-index to every element in place.
    ///
    /// # Errors
    /// Same aliasing guard as [`NdArray::transform_in_place`]: indexed
    /// mutation requires one-to-one physical addressing.
    pub fn transform_indexed_in_place<R: IntoComplex>(
        &mut self,
        mut f: impl FnMut(&[usize], Complex64) -> R,
    ) -> Result<()> {
        self.ensure_unaliased()?;
        let entries: Vec<(Vec<usize>, usize)> = self.indexed_positions().collect();
        let mut s = self.store.borrow_mut();
        for (index, pos) in entries {
            let z = f(&index, c64(s.re[pos], s.im[pos])).into_complex();
            s.re[pos] = z.re;
            s.im[pos] = z.im;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Scalar elementwise operators
    // ------------------------------------------------------------------

    pub fn plus_scalar<V: IntoComplex>(&self, v: V) -> Self {
        let v = v.into_complex();
        self.transform(|z| z + v)
    }

    pub fn minus_scalar<V: IntoComplex>(&self, v: V) -> Self {
        let v = v.into_complex();
        self.transform(|z| z - v)
    }

    pub fn times_scalar<V: IntoComplex>(&self, v: V) -> Self {
        let v = v.into_complex();
        self.transform(|z| z * v)
    }

    /// Elementwise division by a scalar.
    ///
    /// # Errors
    /// Fails with [`NumkError::DivisionByZero`] for a zero-modulus divisor.
    pub fn divide_scalar<V: IntoComplex>(&self, v: V) -> Result<Self> {
        let v = v.into_complex();
        self.try_transform(|z| z.checked_div(v))
    }

    /// Elementwise remainder by a scalar (real operands only).
    pub fn remainder_scalar<V: IntoComplex>(&self, v: V) -> Result<Self> {
        let v = v.into_complex();
        self.try_transform(|z| z.checked_rem(v))
    }

    pub fn neg(&self) -> Self {
        self.transform(|z| -z)
    }

    pub fn plus_assign<V: IntoComplex>(&mut self, v: V) -> Result<()> {
        let v = v.into_complex();
        self.transform_in_place(|z| z + v)
    }

    pub fn minus_assign<V: IntoComplex>(&mut self, v: V) -> Result<()> {
        let v = v.into_complex();
        self.transform_in_place(|z| z - v)
    }

    pub fn times_assign<V: IntoComplex>(&mut self, v: V) -> Result<()> {
        let v = v.into_complex();
        self.transform_in_place(|z| z * v)
    }

    pub fn divide_assign<V: IntoComplex>(&mut self, v: V) -> Result<()> {
        let v = v.into_complex();
        self.try_transform_in_place(|z| z.checked_div(v))
    }

    pub fn remainder_assign<V: IntoComplex>(&mut self, v: V) -> Result<()> {
        let v = v.into_complex();
        self.try_transform_in_place(|z| z.checked_rem(v))
    }

    // ------------------------------------------------------------------
    // Array elementwise operators (broadcasting)
    // ------------------------------------------------------------------

    /// Combine two arrays elementwise after aligning their shapes under
    /// the broadcasting rule.
    pub fn zip_with<R: IntoComplex>(
        &self,
        other: &NdArray,
        mut f: impl FnMut(Complex64, Complex64) -> R,
    ) -> Result<Self> {
        self.try_zip_with(other, |a, b| Ok(f(a, b)))
    }

    /// [`NdArray::zip_with`] with a fallible element function.
    pub fn try_zip_with<R: IntoComplex>(
        &self,
        other: &NdArray,
        mut f: impl FnMut(Complex64, Complex64) -> Result<R>,
    ) -> Result<Self> {
        let (a, b) = broadcast(self, other)?;
        let sa = a.store.borrow();
        let sb = b.store.borrow();
        let mut re = Vec::with_capacity(a.numel());
        let mut im = Vec::with_capacity(a.numel());
        for (p, q) in a.positions().zip(b.positions()) {
            let z = f(c64(sa.re[p], sa.im[p]), c64(sb.re[q], sb.im[q]))?.into_complex();
            re.push(z.re);
            im.push(z.im);
        }
        Ok(Self::from_parts(a.shape.clone(), re, im))
    }

    pub fn plus(&self, other: &NdArray) -> Result<Self> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn minus(&self, other: &NdArray) -> Result<Self> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn times(&self, other: &NdArray) -> Result<Self> {
        self.zip_with(other, |a, b| a * b)
    }

    pub fn divide(&self, other: &NdArray) -> Result<Self> {
        self.try_zip_with(other, |a, b| a.checked_div(b))
    }

    pub fn remainder(&self, other: &NdArray) -> Result<Self> {
        self.try_zip_with(other, |a, b| a.checked_rem(b))
    }

    // ------------------------------------------------------------------
    // Comparison, masks and selection
    // ------------------------------------------------------------------

    /// 0/1 mask of exact elementwise equality with `other`.
    ///
    /// # Errors
    /// Fails with [`NumkError::ShapeMismatch`] unless the shapes are
    /// identical; comparison does not broadcast.
    pub fn compare(&self, other: &NdArray) -> Result<Self> {
        if self.shape != other.shape {
            return Err(NumkError::ShapeMismatch(
                self.shape.clone(),
                other.shape.clone(),
            ));
        }
        let sa = self.store.borrow();
        let sb = other.store.borrow();
        let mut re = Vec::with_capacity(self.numel());
        for (p, q) in self.positions().zip(other.positions()) {
            let equal = sa.re[p] == sb.re[q] && sa.im[p] == sb.im[q];
            re.push(if equal { 1.0 } else { 0.0 });
        }
        let im = vec![0.0; re.len()];
        Ok(Self::from_parts(self.shape.clone(), re, im))
    }

    /// 0/1 mask of relaxed equality with a scalar.
    pub fn compare_scalar<V: IntoComplex>(&self, v: V) -> Self {
        let v = v.into_complex();
        self.mask(move |z| z == v)
    }

    /// 0/1 mask of a predicate over every logical element.
    pub fn mask(&self, mut pred: impl FnMut(Complex64) -> bool) -> Self {
        self.transform(|z| if pred(z) { 1.0 } else { 0.0 })
    }

    /// Keep elements where `mask` is 1, zero elsewhere.
    ///
    /// # Errors
    /// Fails with [`NumkError::ShapeMismatch`] on differing shapes and
    /// with [`NumkError::InvalidMaskValue`] when the mask holds anything
    /// other than 0 or 1.
    pub fn select(&self, mask: &NdArray) -> Result<Self> {
        if self.shape != mask.shape {
            return Err(NumkError::ShapeMismatch(
                self.shape.clone(),
                mask.shape.clone(),
            ));
        }
        let sv = self.store.borrow();
        let sm = mask.store.borrow();
        let mut re = Vec::with_capacity(self.numel());
        let mut im = Vec::with_capacity(self.numel());
        for ((index, p), q) in self.indexed_positions().zip(mask.positions()) {
            let z = c64(sv.re[p], sv.im[p]);
            let m = c64(sm.re[q], sm.im[q]);
            let kept = if m == c64(0.0, 0.0) {
                c64(0.0, 0.0)
            } else if m == c64(1.0, 0.0) {
                z
            } else {
                return Err(NumkError::InvalidMaskValue { value: m, index });
            };
            re.push(kept.re);
            im.push(kept.im);
        }
        Ok(Self::from_parts(self.shape.clone(), re, im))
    }

    // ------------------------------------------------------------------
    // Reductions
    // ------------------------------------------------------------------

    /// Whether the predicate holds for every element. Short-circuits.
    pub fn all(&self, mut pred: impl FnMut(Complex64) -> bool) -> bool {
        let s = self.store.borrow();
        self.positions().all(|pos| pred(c64(s.re[pos], s.im[pos])))
    }

    /// Whether the predicate holds for any element. Short-circuits.
    pub fn any(&self, mut pred: impl FnMut(Complex64) -> bool) -> bool {
        let s = self.store.borrow();
        self.positions().any(|pos| pred(c64(s.re[pos], s.im[pos])))
    }

    /// Whether the predicate holds for no element.
    pub fn none(&self, pred: impl FnMut(Complex64) -> bool) -> bool {
        !self.any(pred)
    }

    /// Membership under relaxed scalar equality.
    pub fn contains<V: IntoComplex>(&self, v: V) -> bool {
        let v = v.into_complex();
        self.any(move |z| z == v)
    }
}
