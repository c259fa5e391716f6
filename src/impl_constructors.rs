// Copyright 2025 numarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Constructor methods for `NumArray`.

use crate::data_repr::{zeros_elements, Elements, SharedBuffer};
use crate::error::{shape_mismatch, ArrayError};
use crate::kind::{ElementKind, Scalar};
use crate::shape::{default_strides, size_of_shape, size_of_shape_checked};
use crate::NumArray;

impl NumArray {
    /// Wrap a contiguous buffer in a fresh array value with default
    /// (row-major) layout.
    pub(crate) fn from_parts(data: SharedBuffer, dims: Vec<usize>) -> NumArray {
        debug_assert_eq!(data.len(), size_of_shape(&dims));
        let strides = default_strides(&dims);
        NumArray {
            data,
            dims,
            strides,
            offset: 0,
        }
    }

    /// Create an array with the given shape from a flat vector of
    /// elements in row-major order.
    ///
    /// The element kind is taken from the vector type: `Vec<i64>`,
    /// `Vec<f64>` and `Vec<Complex64>` are accepted.
    ///
    /// **Errors** with `ShapeMismatch` if the element count does not
    /// match the shape.
    pub fn from_shape_vec(
        dims: &[usize],
        data: impl Into<SharedBuffer>,
    ) -> Result<NumArray, ArrayError> {
        let data = data.into();
        let n = size_of_shape_checked(dims)?;
        if data.len() != n {
            return Err(shape_mismatch(format!(
                "shape {:?} requires {} elements, got {}",
                dims,
                n,
                data.len()
            )));
        }
        Ok(NumArray::from_parts(data, dims.to_vec()))
    }

    /// Create an array of the given shape where every element is
    /// `value` (the "constant fill" constructor).
    pub fn full(dims: &[usize], value: impl Into<Scalar>) -> Result<NumArray, ArrayError> {
        let value = value.into();
        let n = size_of_shape_checked(dims)?;
        let mut elements = zeros_elements(value.kind(), n)?;
        match (&mut elements, value) {
            (Elements::Int64(v), Scalar::Int64(x)) => v.fill(x),
            (Elements::Float64(v), Scalar::Float64(x)) => v.fill(x),
            (Elements::Complex128(v), Scalar::Complex128(x)) => v.fill(x),
            _ => unreachable!(),
        }
        Ok(NumArray::from_parts(SharedBuffer::new(elements), dims.to_vec()))
    }

    /// Create a zero-filled array of the given shape and kind.
    pub fn zeros(dims: &[usize], kind: ElementKind) -> Result<NumArray, ArrayError> {
        let elements = zeros_elements(kind, size_of_shape_checked(dims)?)?;
        Ok(NumArray::from_parts(SharedBuffer::new(elements), dims.to_vec()))
    }

    /// Create a rank-0 array holding a single scalar.
    pub fn scalar(value: impl Into<Scalar>) -> NumArray {
        let data = match value.into() {
            Scalar::Int64(x) => SharedBuffer::from(vec![x]),
            Scalar::Float64(x) => SharedBuffer::from(vec![x]),
            Scalar::Complex128(x) => SharedBuffer::from(vec![x]),
        };
        NumArray::from_parts(data, Vec::new())
    }

    /// Create an `n` × `m` identity matrix of the given kind: ones on
    /// the main diagonal, zeros elsewhere.
    pub fn eye(n: usize, m: usize, kind: ElementKind) -> Result<NumArray, ArrayError> {
        let len = n.checked_mul(m).ok_or_else(|| {
            shape_mismatch(format!("{} x {} identity overflows the addressable size", n, m))
        })?;
        let mut elements = zeros_elements(kind, len)?;
        let k = n.min(m);
        match &mut elements {
            Elements::Int64(v) => (0..k).for_each(|i| v[i * m + i] = 1),
            Elements::Float64(v) => (0..k).for_each(|i| v[i * m + i] = 1.0),
            Elements::Complex128(v) => (0..k).for_each(|i| v[i * m + i] = 1.0.into()),
        }
        Ok(NumArray::from_parts(SharedBuffer::new(elements), vec![n, m]))
    }
}
