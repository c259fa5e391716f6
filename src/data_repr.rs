// Copyright 2025 numarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The shared, kind-tagged element buffer and its copy-on-write gate.

use std::sync::Arc;

use num_complex::Complex64;

use crate::error::{allocation_failure, ArrayError};
use crate::kind::{ElementKind, Scalar};

/// Contiguous element storage of one kind.
#[derive(Clone, Debug)]
pub(crate) enum Elements {
    Int64(Vec<i64>),
    Float64(Vec<f64>),
    Complex128(Vec<Complex64>),
}

impl Elements {
    pub(crate) fn kind(&self) -> ElementKind {
        match self {
            Elements::Int64(_) => ElementKind::Int64,
            Elements::Float64(_) => ElementKind::Float64,
            Elements::Complex128(_) => ElementKind::Complex128,
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Elements::Int64(v) => v.len(),
            Elements::Float64(v) => v.len(),
            Elements::Complex128(v) => v.len(),
        }
    }

    fn try_clone(&self) -> Result<Elements, ArrayError> {
        fn dup<T: Copy>(v: &[T]) -> Result<Vec<T>, ArrayError> {
            let mut out = Vec::new();
            out.try_reserve_exact(v.len())
                .map_err(|_| allocation_failure(v.len()))?;
            out.extend_from_slice(v);
            Ok(out)
        }
        Ok(match self {
            Elements::Int64(v) => Elements::Int64(dup(v)?),
            Elements::Float64(v) => Elements::Float64(dup(v)?),
            Elements::Complex128(v) => Elements::Complex128(dup(v)?),
        })
    }
}

/// Allocate a zero-filled element vector, reporting failure instead of
/// aborting. Result buffers and `ensure_unique` both come through here.
pub(crate) fn try_alloc<T: Copy + Default>(len: usize) -> Result<Vec<T>, ArrayError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| allocation_failure(len))?;
    v.resize(len, T::default());
    Ok(v)
}

/// Allocate zero-filled storage of the given kind.
pub(crate) fn zeros_elements(kind: ElementKind, len: usize) -> Result<Elements, ArrayError> {
    Ok(match kind {
        ElementKind::Int64 => Elements::Int64(try_alloc(len)?),
        ElementKind::Float64 => Elements::Float64(try_alloc(len)?),
        ElementKind::Complex128 => Elements::Complex128(try_alloc(len)?),
    })
}

/// Reference-counted element storage shared between array values.
///
/// Cloning the handle is O(1) and shares the allocation; the buffer is
/// never written through a handle while another handle refers to it
/// (see [`SharedBuffer::ensure_unique`]).
#[derive(Clone, Debug)]
pub struct SharedBuffer(Arc<Elements>);

impl SharedBuffer {
    pub(crate) fn new(elements: Elements) -> SharedBuffer {
        SharedBuffer(Arc::new(elements))
    }

    /// The element kind stored in this buffer.
    pub fn kind(&self) -> ElementKind {
        self.0.kind()
    }

    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.len() == 0
    }

    /// Whether another array value currently references this buffer.
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.0) > 1
    }

    /// Copy-on-write gate: give this handle a private copy of the
    /// elements if the buffer is shared, otherwise do nothing. Must be
    /// called before any in-place write. The copy completes before the
    /// caller can write, so a failure leaves every observer intact.
    pub(crate) fn ensure_unique(&mut self) -> Result<(), ArrayError> {
        if self.is_shared() {
            self.0 = Arc::new(self.0.try_clone()?);
        }
        Ok(())
    }

    pub(crate) fn elements(&self) -> &Elements {
        &self.0
    }

    /// Mutable element access. The buffer must already be unshared.
    pub(crate) fn elements_mut(&mut self) -> &mut Elements {
        debug_assert!(!self.is_shared(), "buffer must be unshared before mutation");
        Arc::get_mut(&mut self.0).expect("buffer must be unshared before mutation")
    }

    /// Read the element at `i` as a tagged scalar.
    pub(crate) fn get(&self, i: usize) -> Scalar {
        match &*self.0 {
            Elements::Int64(v) => Scalar::Int64(v[i]),
            Elements::Float64(v) => Scalar::Float64(v[i]),
            Elements::Complex128(v) => Scalar::Complex128(v[i]),
        }
    }

    /// Read the element at `i` in an Int64 buffer.
    pub(crate) fn get_i64(&self, i: usize) -> i64 {
        match &*self.0 {
            Elements::Int64(v) => v[i],
            _ => unreachable!("promotion routed a non-int buffer into an int loop"),
        }
    }

    /// Read the element at `i`, upcast to f64. Only reachable for real
    /// kinds: promotion never sends a complex operand into a f64 loop.
    pub(crate) fn get_f64(&self, i: usize) -> f64 {
        match &*self.0 {
            Elements::Int64(v) => v[i] as f64,
            Elements::Float64(v) => v[i],
            Elements::Complex128(_) => {
                unreachable!("promotion routed a complex buffer into a f64 loop")
            }
        }
    }

    /// Read the element at `i`, upcast to Complex128.
    pub(crate) fn get_c128(&self, i: usize) -> Complex64 {
        match &*self.0 {
            Elements::Int64(v) => Complex64::new(v[i] as f64, 0.0),
            Elements::Float64(v) => Complex64::new(v[i], 0.0),
            Elements::Complex128(v) => v[i],
        }
    }

    /// Write a scalar of the buffer's own kind at `i`. The buffer must
    /// be unshared and the scalar kind must match.
    pub(crate) fn put(&mut self, i: usize, value: Scalar) {
        match (self.elements_mut(), value) {
            (Elements::Int64(v), Scalar::Int64(x)) => v[i] = x,
            (Elements::Float64(v), Scalar::Float64(x)) => v[i] = x,
            (Elements::Complex128(v), Scalar::Complex128(x)) => v[i] = x,
            _ => unreachable!("scalar kind must be narrowed to the buffer kind first"),
        }
    }
}

impl From<Vec<i64>> for SharedBuffer {
    fn from(v: Vec<i64>) -> SharedBuffer {
        SharedBuffer::new(Elements::Int64(v))
    }
}

impl From<Vec<f64>> for SharedBuffer {
    fn from(v: Vec<f64>) -> SharedBuffer {
        SharedBuffer::new(Elements::Float64(v))
    }
}

impl From<Vec<Complex64>> for SharedBuffer {
    fn from(v: Vec<Complex64>) -> SharedBuffer {
        SharedBuffer::new(Elements::Complex128(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_until_ensure_unique() {
        let mut a = SharedBuffer::from(vec![1i64, 2, 3]);
        assert!(!a.is_shared());
        let b = a.clone();
        assert!(a.is_shared() && b.is_shared());
        a.ensure_unique().unwrap();
        assert!(!a.is_shared());
        assert!(!b.is_shared());
        if let Elements::Int64(v) = a.elements_mut() {
            v[0] = 99;
        }
        assert_eq!(b.get_i64(0), 1);
        assert_eq!(a.get_i64(0), 99);
    }

    #[test]
    fn ensure_unique_is_noop_when_unshared() {
        let mut a = SharedBuffer::from(vec![1.0f64]);
        let before = a.elements() as *const Elements;
        a.ensure_unique().unwrap();
        assert_eq!(before, a.elements() as *const Elements);
    }
}
