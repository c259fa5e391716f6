// Copyright 2025 numarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Metadata queries, structural (shape/view) operations, the
//! copy-on-write gate and bounds-checked element access.

use crate::data_repr::{try_alloc, Elements, SharedBuffer};
use crate::error::{out_of_range, shape_mismatch, ArrayError};
use crate::kind::{ElementKind, Scalar};
use crate::shape::{
    broadcast_shape, broadcast_strides, default_strides, is_default_layout, size_of_shape,
    size_of_shape_checked, OffsetIter,
};
use crate::slice::Slice;
use crate::NumArray;

/// Read-only metadata snapshot of an array value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayInfo {
    pub kind: ElementKind,
    pub dims: Vec<usize>,
    pub elements: usize,
    pub shared: bool,
}

/// Copy a strided view into a fresh contiguous vector. Unit-stride
/// views take the slice-copy path.
fn gather<T: Copy + Default>(
    src: &[T],
    base: usize,
    dims: &[usize],
    strides: &[isize],
) -> Result<Vec<T>, ArrayError> {
    let n = size_of_shape(dims);
    if is_default_layout(dims, strides) {
        let mut out = try_alloc::<T>(n)?;
        out.copy_from_slice(&src[base..base + n]);
        return Ok(out);
    }
    let mut out = try_alloc::<T>(n)?;
    let mut it = OffsetIter::new(dims, &[(base as isize, strides)]);
    let mut i = 0;
    while let Some(offs) = it.next() {
        out[i] = src[offs[0] as usize];
        i += 1;
    }
    Ok(out)
}

impl NumArray {
    /// The element kind of this array.
    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    /// The dimension sizes.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// The dimension sizes (alias of [`dims`](NumArray::dims)).
    pub fn shape(&self) -> &[usize] {
        &self.dims
    }

    /// The number of dimensions (rank); 0 for a scalar array.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// The element strides.
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// The total number of elements.
    pub fn len(&self) -> usize {
        size_of_shape(&self.dims)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Metadata snapshot: kind, shape, element count, buffer sharing.
    /// Allocates no element data.
    pub fn info(&self) -> ArrayInfo {
        ArrayInfo {
            kind: self.kind(),
            dims: self.dims.clone(),
            elements: self.len(),
            shared: self.data.is_shared(),
        }
    }

    /// Whether this value's buffer is also referenced by another value.
    pub fn is_shared(&self) -> bool {
        self.data.is_shared()
    }

    /// Whether the view is contiguous in row-major order.
    pub(crate) fn is_contiguous(&self) -> bool {
        is_default_layout(&self.dims, &self.strides)
    }

    pub(crate) fn base_offset(&self) -> isize {
        self.offset as isize
    }

    /// Strides of this operand under the broadcast shape `target`.
    pub(crate) fn strides_for(&self, target: &[usize]) -> Vec<isize> {
        broadcast_strides(&self.dims, &self.strides, target)
    }

    /// Copy-on-write gate: if the buffer is shared, replace it with a
    /// private contiguous copy of this view's elements. Callers must
    /// re-read strides and offset afterwards. This is the only place
    /// in-place operations allocate.
    pub(crate) fn ensure_unique(&mut self) -> Result<(), ArrayError> {
        if !self.data.is_shared() {
            return Ok(());
        }
        if self.is_contiguous() && self.offset == 0 && self.len() == self.data.len() {
            return self.data.ensure_unique();
        }
        *self = self.fast_copy()?;
        Ok(())
    }

    /// Materialize the view into a fresh array with contiguous
    /// row-major storage, using a block copy when the view already has
    /// unit stride.
    pub fn fast_copy(&self) -> Result<NumArray, ArrayError> {
        let elements = match self.data.elements() {
            Elements::Int64(v) => {
                Elements::Int64(gather(v, self.offset, &self.dims, &self.strides)?)
            }
            Elements::Float64(v) => {
                Elements::Float64(gather(v, self.offset, &self.dims, &self.strides)?)
            }
            Elements::Complex128(v) => {
                Elements::Complex128(gather(v, self.offset, &self.dims, &self.strides)?)
            }
        };
        Ok(NumArray::from_parts(
            SharedBuffer::new(elements),
            self.dims.clone(),
        ))
    }

    /// Change the shape without changing the element order.
    ///
    /// For a contiguous view this is a pure metadata operation: the
    /// result shares the buffer. A strided view is materialized first.
    ///
    /// **Errors** with `ShapeMismatch` if the element counts differ.
    pub fn reshape(&self, dims: &[usize]) -> Result<NumArray, ArrayError> {
        let n = size_of_shape_checked(dims)?;
        if n != self.len() {
            return Err(shape_mismatch(format!(
                "cannot reshape {:?} ({} elements) into {:?} ({} elements)",
                self.dims,
                self.len(),
                dims,
                n
            )));
        }
        if self.is_contiguous() {
            return Ok(NumArray {
                data: self.data.clone(),
                dims: dims.to_vec(),
                strides: default_strides(dims),
                offset: self.offset,
            });
        }
        let mut out = self.fast_copy()?;
        out.dims = dims.to_vec();
        out.strides = default_strides(dims);
        Ok(out)
    }

    /// Reverse the dimension order (matrix transpose for 2-D input).
    /// A metadata-only operation; the result shares the buffer.
    pub fn transpose(&self) -> NumArray {
        let mut out = self.clone();
        out.dims.reverse();
        out.strides.reverse();
        out
    }

    /// Conjugate transpose: [`transpose`](NumArray::transpose) plus an
    /// elementwise complex conjugation. For real kinds this is the
    /// plain transpose.
    pub fn adjoint(&self) -> Result<NumArray, ArrayError> {
        match self.kind() {
            ElementKind::Complex128 => self.transpose().conj(),
            _ => Ok(self.transpose()),
        }
    }

    /// Remove all singleton (size-1) dimensions, preserving element
    /// order and count. An all-singleton shape collapses to rank 0.
    pub fn strip_singleton_dims(&self) -> NumArray {
        let mut out = self.clone();
        let kept: Vec<(usize, isize)> = out
            .dims
            .iter()
            .zip(&out.strides)
            .filter(|(&d, _)| d != 1)
            .map(|(&d, &s)| (d, s))
            .collect();
        out.dims = kept.iter().map(|&(d, _)| d).collect();
        out.strides = kept.iter().map(|&(_, s)| s).collect();
        out
    }

    /// Extract the sub-region selected by one [`Slice`] per axis.
    /// Trailing axes without an entry are taken in full. The result is
    /// a view sharing the buffer (metadata only).
    ///
    /// **Errors** with `OutOfRange` when a bound falls outside its
    /// axis, `ShapeMismatch` when more slices than axes are given.
    pub fn slice(&self, args: &[Slice]) -> Result<NumArray, ArrayError> {
        let (dims, strides, offset) = self.resolve_slice(args)?;
        Ok(NumArray {
            data: self.data.clone(),
            dims,
            strides,
            offset,
        })
    }

    /// Resolve slice arguments against this view's descriptor.
    fn resolve_slice(
        &self,
        args: &[Slice],
    ) -> Result<(Vec<usize>, Vec<isize>, usize), ArrayError> {
        if args.len() > self.ndim() {
            return Err(shape_mismatch(format!(
                "{} slices given for {} axes",
                args.len(),
                self.ndim()
            )));
        }
        let mut dims = self.dims.clone();
        let mut strides = self.strides.clone();
        let mut offset = self.offset as isize;
        for (ax, s) in args.iter().enumerate() {
            let (first, count, step) = s.resolve(self.dims[ax])?;
            offset += first as isize * self.strides[ax];
            dims[ax] = count;
            strides[ax] = self.strides[ax] * step;
        }
        Ok((dims, strides, offset as usize))
    }

    fn flat_offset(&self, index: &[usize]) -> Result<usize, ArrayError> {
        if index.len() != self.ndim() {
            return Err(out_of_range(format!(
                "index of rank {} into array of rank {}",
                index.len(),
                self.ndim()
            )));
        }
        let mut off = self.offset as isize;
        for (ax, (&i, &d)) in index.iter().zip(&self.dims).enumerate() {
            if i >= d {
                return Err(out_of_range(format!(
                    "index {} out of bounds for axis {} of length {}",
                    i, ax, d
                )));
            }
            off += i as isize * self.strides[ax];
        }
        Ok(off as usize)
    }

    /// Read the element at `index` (one entry per axis).
    pub fn get(&self, index: &[usize]) -> Result<Scalar, ArrayError> {
        let off = self.flat_offset(index)?;
        Ok(self.data.get(off))
    }

    /// Write `value` at `index`, unsharing the buffer first.
    ///
    /// The value is narrowed into the array's own kind; a lossy
    /// narrowing fails with `Representability` before anything is
    /// written.
    pub fn set(&mut self, index: &[usize], value: impl Into<Scalar>) -> Result<(), ArrayError> {
        let value = value.into().narrow(self.kind())?;
        self.flat_offset(index)?;
        self.ensure_unique()?;
        // the layout may have been normalized by the unshare
        let off = self.flat_offset(index)?;
        self.data.put(off, value);
        Ok(())
    }

    /// Bulk write into the region selected by `args`: `src` is
    /// broadcast over the region and narrowed into this array's kind.
    /// Elements outside the region are untouched. All validation
    /// happens before the first write.
    pub fn set_slice(&mut self, args: &[Slice], src: &NumArray) -> Result<(), ArrayError> {
        let (rdims, ..) = self.resolve_slice(args)?;
        if broadcast_shape(&rdims, &src.dims)? != rdims {
            return Err(shape_mismatch(format!(
                "cannot assign shape {:?} into region {:?}",
                src.dims, rdims
            )));
        }
        let src_strides = src.strides_for(&rdims);
        // pre-validate narrowing so a failure leaves the region intact
        if src.kind() > self.kind() {
            let kind = self.kind();
            let mut it = OffsetIter::new(&rdims, &[(src.base_offset(), &src_strides)]);
            while let Some(offs) = it.next() {
                src.data.get(offs[0] as usize).narrow(kind)?;
            }
        }
        self.ensure_unique()?;
        let (rdims, rstrides, roffset) = self.resolve_slice(args)?;
        let kind = self.kind();
        let mut it = OffsetIter::new(
            &rdims,
            &[
                (roffset as isize, &rstrides),
                (src.base_offset(), &src_strides),
            ],
        );
        while let Some(offs) = it.next() {
            let (dst, s) = (offs[0] as usize, offs[1] as usize);
            let value = src.data.get(s).narrow(kind)?;
            self.data.put(dst, value);
        }
        Ok(())
    }

    /// Convert every element to `kind`, returning a new array of the
    /// same shape. Widening conversions always succeed; narrowing ones
    /// fail with `Representability` when information would be lost.
    pub fn astype(&self, kind: ElementKind) -> Result<NumArray, ArrayError> {
        if kind == self.kind() {
            return self.fast_copy();
        }
        let mut out = NumArray::zeros(&self.dims, kind)?;
        let strides = self.strides.clone();
        let mut it = OffsetIter::new(&self.dims, &[(self.base_offset(), &strides)]);
        let mut i = 0;
        while let Some(offs) = it.next() {
            let v = self.data.get(offs[0] as usize).narrow(kind)?;
            out.data.put(i, v);
            i += 1;
        }
        Ok(out)
    }
}
