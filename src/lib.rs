// Copyright 2025 numarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `numarray` crate provides [`NumArray`], a dense n-dimensional
//! numeric container over a closed set of element kinds
//! (int64, float64, complex128) with:
//!
//! - reference-counted storage with copy-on-write mutation
//!   (a clone is O(rank); the buffer is copied only when one of the
//!   sharing values is written to),
//! - automatic kind promotion for mixed-kind operands,
//! - broadcasting of compatible shapes in all elementwise operations,
//! - relational, boolean and transcendental element maps,
//! - reductions over all elements or along one axis,
//! - QR-based linear algebra (decomposition, least-squares solve,
//!   matrix power, linear regression).
//!
//! Every fallible operation returns `Result<_, ArrayError>`; a failed
//! operation never leaves a partially written operand behind.
//!
//! ## Crate summary
//!
//! ```
//! use numarray::{NumArray, Scalar};
//!
//! let a = NumArray::from_shape_vec(&[3, 1], vec![1.0, 2.0, 3.0]).unwrap();
//! let b = NumArray::from_shape_vec(&[1, 4], vec![10.0, 20.0, 30.0, 40.0]).unwrap();
//! let c = a.plus(&b).unwrap();
//! assert_eq!(c.dims(), &[3, 4]);
//! assert_eq!(c.get(&[2, 1]).unwrap(), Scalar::Float64(23.0));
//! ```

mod data_repr;
mod error;
mod kind;
mod shape;
mod slice;

mod impl_constructors;
mod impl_methods;
mod impl_numeric;
mod impl_ops;
pub mod linalg;

pub use crate::data_repr::SharedBuffer;
pub use crate::error::{ArrayError, ErrorKind};
pub use crate::impl_methods::ArrayInfo;
pub use crate::kind::{ElementKind, Scalar, KIND_NAMES};
pub use crate::linalg::{linreg, LinReg};
pub use crate::shape::{broadcast_shape, Axis};
pub use crate::slice::Slice;

pub use num_complex::Complex64;

/// An n-dimensional numeric array value.
///
/// A `NumArray` couples a shape descriptor (dimension sizes, element
/// strides, base offset) with a handle to a [`SharedBuffer`]. Several
/// values may reference one buffer; in-place operations unshare it
/// first, so values never observe each other's mutations.
///
/// The shape descriptor is private to each value even when the buffer
/// is shared: transposing or reshaping one of two sharing values does
/// not affect the other.
#[derive(Clone, Debug)]
pub struct NumArray {
    pub(crate) data: SharedBuffer,
    pub(crate) dims: Vec<usize>,
    pub(crate) strides: Vec<isize>,
    pub(crate) offset: usize,
}
