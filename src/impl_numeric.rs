// Copyright 2025 numarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Reductions over all elements or along one axis.
//!
//! Axis reductions remove the reduced axis from the result shape (a
//! reduction along the only axis of a vector yields a rank-0 array).
//! Reducing zero elements is a `DomainError`, except `all` (vacuously
//! true) and `any` (vacuously false). `min`/`max` over complex
//! elements use the lexicographic (real, then imaginary) total order.

use std::cmp::Ordering;

use num_complex::Complex64;

use crate::data_repr::{try_alloc, Elements, SharedBuffer};
use crate::error::{domain_error, out_of_range, ArrayError};
use crate::kind::{complex_cmp, ElementKind, Scalar};
use crate::shape::{size_of_shape, Axis, OffsetIter};
use crate::NumArray;

impl NumArray {
    /// Reduced dims/strides plus the length and stride of `axis`.
    fn axis_setup(&self, axis: Axis) -> Result<(Vec<usize>, Vec<isize>, usize, isize), ArrayError> {
        let ax = axis.index();
        if ax >= self.ndim() {
            return Err(out_of_range(format!(
                "axis {} out of bounds for rank {}",
                ax,
                self.ndim()
            )));
        }
        let mut dims = self.dims.clone();
        let mut strides = self.strides.clone();
        let n = dims.remove(ax);
        let stride = strides.remove(ax);
        Ok((dims, strides, n, stride))
    }

    fn require_nonempty(&self, what: &str) -> Result<(), ArrayError> {
        if self.is_empty() {
            return Err(domain_error(format!("{} of an empty array", what)));
        }
        Ok(())
    }

    /// Sum of all elements, in the array's own kind (Int64 wraps).
    pub fn sum(&self) -> Result<Scalar, ArrayError> {
        self.require_nonempty("sum")?;
        let mut it = OffsetIter::new(&self.dims, &[(self.base_offset(), &self.strides)]);
        Ok(match self.kind() {
            ElementKind::Int64 => {
                let mut acc = 0i64;
                while let Some(o) = it.next() {
                    acc = acc.wrapping_add(self.data.get_i64(o[0] as usize));
                }
                Scalar::Int64(acc)
            }
            ElementKind::Float64 => {
                let mut acc = 0f64;
                while let Some(o) = it.next() {
                    acc += self.data.get_f64(o[0] as usize);
                }
                Scalar::Float64(acc)
            }
            ElementKind::Complex128 => {
                let mut acc = Complex64::new(0.0, 0.0);
                while let Some(o) = it.next() {
                    acc += self.data.get_c128(o[0] as usize);
                }
                Scalar::Complex128(acc)
            }
        })
    }

    fn extremum(&self, what: &str, keep: Ordering) -> Result<Scalar, ArrayError> {
        self.require_nonempty(what)?;
        let mut it = OffsetIter::new(&self.dims, &[(self.base_offset(), &self.strides)]);
        let first = match it.next() {
            Some(o) => o[0] as usize,
            None => unreachable!("emptiness checked above"),
        };
        Ok(match self.kind() {
            ElementKind::Int64 => {
                let mut acc = self.data.get_i64(first);
                while let Some(o) = it.next() {
                    let x = self.data.get_i64(o[0] as usize);
                    if x.cmp(&acc) == keep {
                        acc = x;
                    }
                }
                Scalar::Int64(acc)
            }
            ElementKind::Float64 => {
                let mut acc = self.data.get_f64(first);
                while let Some(o) = it.next() {
                    let x = self.data.get_f64(o[0] as usize);
                    if x.total_cmp(&acc) == keep {
                        acc = x;
                    }
                }
                Scalar::Float64(acc)
            }
            ElementKind::Complex128 => {
                let mut acc = self.data.get_c128(first);
                while let Some(o) = it.next() {
                    let x = self.data.get_c128(o[0] as usize);
                    if complex_cmp(x, acc) == keep {
                        acc = x;
                    }
                }
                Scalar::Complex128(acc)
            }
        })
    }

    /// Smallest element, in the array's own kind.
    pub fn min(&self) -> Result<Scalar, ArrayError> {
        self.extremum("min", Ordering::Less)
    }

    /// Largest element, in the array's own kind.
    pub fn max(&self) -> Result<Scalar, ArrayError> {
        self.extremum("max", Ordering::Greater)
    }

    /// Arithmetic mean: Float64 for real input, Complex128 for complex.
    pub fn mean(&self) -> Result<Scalar, ArrayError> {
        self.require_nonempty("mean")?;
        let n = self.len() as f64;
        let mut it = OffsetIter::new(&self.dims, &[(self.base_offset(), &self.strides)]);
        Ok(match self.kind() {
            ElementKind::Complex128 => {
                let mut acc = Complex64::new(0.0, 0.0);
                while let Some(o) = it.next() {
                    acc += self.data.get_c128(o[0] as usize);
                }
                Scalar::Complex128(acc / n)
            }
            _ => {
                let mut acc = 0f64;
                while let Some(o) = it.next() {
                    acc += self.data.get_f64(o[0] as usize);
                }
                Scalar::Float64(acc / n)
            }
        })
    }

    /// Standard deviation with divisor `n - ddof` (ddof 0 =
    /// population, 1 = sample). Always Float64: for complex input the
    /// squared deviations are squared moduli.
    pub fn std(&self, ddof: usize) -> Result<Scalar, ArrayError> {
        let n = self.len();
        if n <= ddof {
            return Err(domain_error(format!(
                "std with ddof {} needs more than {} elements",
                ddof, ddof
            )));
        }
        let mean = self.mean()?;
        let mut acc = 0f64;
        let mut it = OffsetIter::new(&self.dims, &[(self.base_offset(), &self.strides)]);
        match (self.kind(), mean) {
            (ElementKind::Complex128, Scalar::Complex128(m)) => {
                while let Some(o) = it.next() {
                    acc += (self.data.get_c128(o[0] as usize) - m).norm_sqr();
                }
            }
            (_, Scalar::Float64(m)) => {
                while let Some(o) = it.next() {
                    let d = self.data.get_f64(o[0] as usize) - m;
                    acc += d * d;
                }
            }
            _ => unreachable!("mean kind follows the input kind"),
        }
        Ok(Scalar::Float64((acc / (n - ddof) as f64).sqrt()))
    }

    /// True iff every element is truthy; vacuously true when empty.
    pub fn all(&self) -> bool {
        let mut it = OffsetIter::new(&self.dims, &[(self.base_offset(), &self.strides)]);
        while let Some(o) = it.next() {
            if !self.data.get(o[0] as usize).is_truthy() {
                return false;
            }
        }
        true
    }

    /// True iff any element is truthy; vacuously false when empty.
    pub fn any(&self) -> bool {
        let mut it = OffsetIter::new(&self.dims, &[(self.base_offset(), &self.strides)]);
        while let Some(o) = it.next() {
            if self.data.get(o[0] as usize).is_truthy() {
                return true;
            }
        }
        false
    }

    /// Sum along `axis`, in the array's own kind. The axis is removed
    /// from the result shape.
    pub fn sum_axis(&self, axis: Axis) -> Result<NumArray, ArrayError> {
        let (dims, strides, n, stride) = self.axis_setup(axis)?;
        if n == 0 {
            return Err(domain_error("sum along an empty axis"));
        }
        let count = size_of_shape(&dims);
        let mut it = OffsetIter::new(&dims, &[(self.base_offset(), &strides)]);
        let elements = match self.kind() {
            ElementKind::Int64 => {
                let mut out = try_alloc::<i64>(count)?;
                let mut i = 0;
                while let Some(o) = it.next() {
                    let mut acc = 0i64;
                    for k in 0..n {
                        acc = acc
                            .wrapping_add(self.data.get_i64((o[0] + k as isize * stride) as usize));
                    }
                    out[i] = acc;
                    i += 1;
                }
                Elements::Int64(out)
            }
            ElementKind::Float64 => {
                let mut out = try_alloc::<f64>(count)?;
                let mut i = 0;
                while let Some(o) = it.next() {
                    let mut acc = 0f64;
                    for k in 0..n {
                        acc += self.data.get_f64((o[0] + k as isize * stride) as usize);
                    }
                    out[i] = acc;
                    i += 1;
                }
                Elements::Float64(out)
            }
            ElementKind::Complex128 => {
                let mut out = try_alloc::<Complex64>(count)?;
                let mut i = 0;
                while let Some(o) = it.next() {
                    let mut acc = Complex64::new(0.0, 0.0);
                    for k in 0..n {
                        acc += self.data.get_c128((o[0] + k as isize * stride) as usize);
                    }
                    out[i] = acc;
                    i += 1;
                }
                Elements::Complex128(out)
            }
        };
        Ok(NumArray::from_parts(SharedBuffer::new(elements), dims))
    }

    fn extremum_axis(
        &self,
        what: &str,
        axis: Axis,
        keep: Ordering,
    ) -> Result<NumArray, ArrayError> {
        let (dims, strides, n, stride) = self.axis_setup(axis)?;
        if n == 0 {
            return Err(domain_error(format!("{} along an empty axis", what)));
        }
        let count = size_of_shape(&dims);
        let mut it = OffsetIter::new(&dims, &[(self.base_offset(), &strides)]);
        let elements = match self.kind() {
            ElementKind::Int64 => {
                let mut out = try_alloc::<i64>(count)?;
                let mut i = 0;
                while let Some(o) = it.next() {
                    let mut acc = self.data.get_i64(o[0] as usize);
                    for k in 1..n {
                        let x = self.data.get_i64((o[0] + k as isize * stride) as usize);
                        if x.cmp(&acc) == keep {
                            acc = x;
                        }
                    }
                    out[i] = acc;
                    i += 1;
                }
                Elements::Int64(out)
            }
            ElementKind::Float64 => {
                let mut out = try_alloc::<f64>(count)?;
                let mut i = 0;
                while let Some(o) = it.next() {
                    let mut acc = self.data.get_f64(o[0] as usize);
                    for k in 1..n {
                        let x = self.data.get_f64((o[0] + k as isize * stride) as usize);
                        if x.total_cmp(&acc) == keep {
                            acc = x;
                        }
                    }
                    out[i] = acc;
                    i += 1;
                }
                Elements::Float64(out)
            }
            ElementKind::Complex128 => {
                let mut out = try_alloc::<Complex64>(count)?;
                let mut i = 0;
                while let Some(o) = it.next() {
                    let mut acc = self.data.get_c128(o[0] as usize);
                    for k in 1..n {
                        let x = self.data.get_c128((o[0] + k as isize * stride) as usize);
                        if complex_cmp(x, acc) == keep {
                            acc = x;
                        }
                    }
                    out[i] = acc;
                    i += 1;
                }
                Elements::Complex128(out)
            }
        };
        Ok(NumArray::from_parts(SharedBuffer::new(elements), dims))
    }

    /// Minimum along `axis`, in the array's own kind.
    pub fn min_axis(&self, axis: Axis) -> Result<NumArray, ArrayError> {
        self.extremum_axis("min", axis, Ordering::Less)
    }

    /// Maximum along `axis`, in the array's own kind.
    pub fn max_axis(&self, axis: Axis) -> Result<NumArray, ArrayError> {
        self.extremum_axis("max", axis, Ordering::Greater)
    }

    /// Mean along `axis`: Float64 for real input, Complex128 for
    /// complex.
    pub fn mean_axis(&self, axis: Axis) -> Result<NumArray, ArrayError> {
        let (dims, strides, n, stride) = self.axis_setup(axis)?;
        if n == 0 {
            return Err(domain_error("mean along an empty axis"));
        }
        let count = size_of_shape(&dims);
        let mut it = OffsetIter::new(&dims, &[(self.base_offset(), &strides)]);
        let elements = match self.kind() {
            ElementKind::Complex128 => {
                let mut out = try_alloc::<Complex64>(count)?;
                let mut i = 0;
                while let Some(o) = it.next() {
                    let mut acc = Complex64::new(0.0, 0.0);
                    for k in 0..n {
                        acc += self.data.get_c128((o[0] + k as isize * stride) as usize);
                    }
                    out[i] = acc / n as f64;
                    i += 1;
                }
                Elements::Complex128(out)
            }
            _ => {
                let mut out = try_alloc::<f64>(count)?;
                let mut i = 0;
                while let Some(o) = it.next() {
                    let mut acc = 0f64;
                    for k in 0..n {
                        acc += self.data.get_f64((o[0] + k as isize * stride) as usize);
                    }
                    out[i] = acc / n as f64;
                    i += 1;
                }
                Elements::Float64(out)
            }
        };
        Ok(NumArray::from_parts(SharedBuffer::new(elements), dims))
    }

    /// Standard deviation along `axis` with divisor `n - ddof`, always
    /// Float64 (see [`std`](NumArray::std)).
    pub fn std_axis(&self, axis: Axis, ddof: usize) -> Result<NumArray, ArrayError> {
        let (dims, strides, n, stride) = self.axis_setup(axis)?;
        if n <= ddof {
            return Err(domain_error(format!(
                "std with ddof {} needs more than {} elements along the axis",
                ddof, ddof
            )));
        }
        let count = size_of_shape(&dims);
        let mut out = try_alloc::<f64>(count)?;
        let mut it = OffsetIter::new(&dims, &[(self.base_offset(), &strides)]);
        let mut i = 0;
        match self.kind() {
            ElementKind::Complex128 => {
                while let Some(o) = it.next() {
                    let mut mean = Complex64::new(0.0, 0.0);
                    for k in 0..n {
                        mean += self.data.get_c128((o[0] + k as isize * stride) as usize);
                    }
                    mean /= n as f64;
                    let mut acc = 0f64;
                    for k in 0..n {
                        acc += (self.data.get_c128((o[0] + k as isize * stride) as usize) - mean)
                            .norm_sqr();
                    }
                    out[i] = (acc / (n - ddof) as f64).sqrt();
                    i += 1;
                }
            }
            _ => {
                while let Some(o) = it.next() {
                    let mut mean = 0f64;
                    for k in 0..n {
                        mean += self.data.get_f64((o[0] + k as isize * stride) as usize);
                    }
                    mean /= n as f64;
                    let mut acc = 0f64;
                    for k in 0..n {
                        let d = self.data.get_f64((o[0] + k as isize * stride) as usize) - mean;
                        acc += d * d;
                    }
                    out[i] = (acc / (n - ddof) as f64).sqrt();
                    i += 1;
                }
            }
        }
        Ok(NumArray::from_parts(
            SharedBuffer::new(Elements::Float64(out)),
            dims,
        ))
    }

    fn truth_axis(&self, axis: Axis, all: bool) -> Result<NumArray, ArrayError> {
        let (dims, strides, n, stride) = self.axis_setup(axis)?;
        let count = size_of_shape(&dims);
        let mut out = try_alloc::<i64>(count)?;
        let mut it = OffsetIter::new(&dims, &[(self.base_offset(), &strides)]);
        let mut i = 0;
        while let Some(o) = it.next() {
            let mut acc = all;
            for k in 0..n {
                let t = self
                    .data
                    .get((o[0] + k as isize * stride) as usize)
                    .is_truthy();
                acc = if all { acc && t } else { acc || t };
                if acc != all {
                    break;
                }
            }
            out[i] = acc as i64;
            i += 1;
        }
        Ok(NumArray::from_parts(
            SharedBuffer::new(Elements::Int64(out)),
            dims,
        ))
    }

    /// Logical all along `axis` (Int64 0/1); vacuously 1 for an empty
    /// axis.
    pub fn all_axis(&self, axis: Axis) -> Result<NumArray, ArrayError> {
        self.truth_axis(axis, true)
    }

    /// Logical any along `axis` (Int64 0/1); vacuously 0 for an empty
    /// axis.
    pub fn any_axis(&self, axis: Axis) -> Result<NumArray, ArrayError> {
        self.truth_axis(axis, false)
    }
}
