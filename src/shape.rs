// Copyright 2025 numarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Shape and stride arithmetic: row-major layouts, the broadcast
//! rules, and the odometer iterator driving every elementwise loop.

use crate::error::{shape_mismatch, ArrayError};

/// An axis index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Axis(pub usize);

impl Axis {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Number of elements addressed by `dims` (1 for rank 0). Callers own
/// the overflow question; shapes entering from outside go through
/// [`size_of_shape_checked`] first.
pub(crate) fn size_of_shape(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// Number of elements addressed by `dims`, failing with `ShapeMismatch`
/// when the product overflows `usize`.
pub(crate) fn size_of_shape_checked(dims: &[usize]) -> Result<usize, ArrayError> {
    let mut n = 1usize;
    for &d in dims {
        n = n.checked_mul(d).ok_or_else(|| {
            shape_mismatch(format!("shape {:?} overflows the addressable size", dims))
        })?;
    }
    Ok(n)
}

/// Row-major strides for a contiguous layout of `dims`.
pub(crate) fn default_strides(dims: &[usize]) -> Vec<isize> {
    let mut strides = vec![1isize; dims.len()];
    let mut s = 1isize;
    for (st, &d) in strides.iter_mut().zip(dims).rev() {
        *st = s;
        s *= d as isize;
    }
    strides
}

/// Whether `strides` describe the contiguous row-major layout of `dims`.
pub(crate) fn is_default_layout(dims: &[usize], strides: &[isize]) -> bool {
    // size-1 axes have no addressing effect, their stride is free
    let mut s = 1isize;
    for (&d, &st) in dims.iter().zip(strides).rev() {
        if d != 1 && st != s {
            return false;
        }
        s *= d as isize;
    }
    true
}

/// The common shape a pair of operand shapes broadcasts to.
///
/// Axes are matched from the trailing end; missing leading axes count
/// as size 1; two matched axes are compatible iff equal or at least
/// one of them is 1.
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Result<Vec<usize>, ArrayError> {
    if a.len() < b.len() {
        return broadcast_shape(b, a);
    }
    let k = a.len() - b.len();
    let mut out = a.to_vec();
    for (o, &bd) in out[k..].iter_mut().zip(b) {
        if *o != bd {
            if *o == 1 {
                *o = bd;
            } else if bd != 1 {
                return Err(shape_mismatch(format!(
                    "cannot broadcast {:?} with {:?}",
                    a, b
                )));
            }
        }
    }
    Ok(out)
}

/// Strides of an operand viewed through the broadcast shape `target`:
/// right-aligned, with stride 0 on every repeated axis.
///
/// `dims` must be broadcast-compatible with `target`.
pub(crate) fn broadcast_strides(dims: &[usize], strides: &[isize], target: &[usize]) -> Vec<isize> {
    debug_assert!(dims.len() <= target.len());
    let k = target.len() - dims.len();
    let mut out = vec![0isize; target.len()];
    for i in 0..dims.len() {
        debug_assert!(dims[i] == target[k + i] || dims[i] == 1);
        if dims[i] != 1 {
            out[k + i] = strides[i];
        }
    }
    out
}

/// Odometer over a shape, tracking one flat offset per operand.
///
/// Each operand is a `(base offset, strides)` pair whose strides are
/// already aligned to the iterated shape (see [`broadcast_strides`]).
/// The iteration order is row-major, which for default-layout output
/// strides means the output offset advances by one per step.
pub(crate) struct OffsetIter {
    dims: Vec<usize>,
    index: Vec<usize>,
    strides: Vec<Vec<isize>>,
    offsets: Vec<isize>,
    remaining: usize,
    started: bool,
}

impl OffsetIter {
    pub(crate) fn new(dims: &[usize], operands: &[(isize, &[isize])]) -> OffsetIter {
        for (_, s) in operands {
            debug_assert_eq!(s.len(), dims.len());
        }
        OffsetIter {
            dims: dims.to_vec(),
            index: vec![0; dims.len()],
            strides: operands.iter().map(|(_, s)| s.to_vec()).collect(),
            offsets: operands.iter().map(|(o, _)| *o).collect(),
            remaining: size_of_shape(dims),
            started: false,
        }
    }

    /// Advance to the next coordinate and return the operand offsets,
    /// or `None` when the shape is exhausted.
    pub(crate) fn next(&mut self) -> Option<&[isize]> {
        if self.remaining == 0 {
            return None;
        }
        if !self.started {
            self.started = true;
            self.remaining -= 1;
            return Some(&self.offsets);
        }
        // increment the innermost axis first, carrying outward
        for ax in (0..self.dims.len()).rev() {
            self.index[ax] += 1;
            if self.index[ax] < self.dims[ax] {
                for (off, st) in self.offsets.iter_mut().zip(&self.strides) {
                    *off += st[ax];
                }
                self.remaining -= 1;
                return Some(&self.offsets);
            }
            self.index[ax] = 0;
            for (off, st) in self.offsets.iter_mut().zip(&self.strides) {
                *off -= st[ax] * (self.dims[ax] as isize - 1);
            }
        }
        // only reachable for rank 0, which yields exactly once
        None
    }
}
