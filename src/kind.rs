// Copyright 2025 numarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Element kinds, the promotion order over them, and the `Scalar`
//! value exchanged by element access and full reductions.

use std::cmp::Ordering;

use num_complex::Complex64;

use crate::error::{representability, ArrayError};

/// The numeric representation of an array's elements.
///
/// Kinds are totally ordered by promotion rank:
/// `Int64 < Float64 < Complex128`. A binary operation computes in the
/// higher-ranked kind of its two operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKind {
    Int64,
    Float64,
    Complex128,
}

/// Display names indexed by kind tag, in promotion-rank order.
pub static KIND_NAMES: [&str; 3] = ["int64", "float64", "complex128"];

impl ElementKind {
    /// Display name of this kind.
    pub fn name(self) -> &'static str {
        KIND_NAMES[self as usize]
    }

    /// The common kind a pair of operand kinds promotes to.
    ///
    /// Total and commutative over the closed kind set; equal kinds map
    /// to themselves.
    #[inline]
    pub fn promote(self, other: ElementKind) -> ElementKind {
        if self >= other {
            self
        } else {
            other
        }
    }
}

/// A single array element, tagged with its kind.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scalar {
    Int64(i64),
    Float64(f64),
    Complex128(Complex64),
}

impl Scalar {
    /// The kind of this scalar.
    pub fn kind(self) -> ElementKind {
        match self {
            Scalar::Int64(_) => ElementKind::Int64,
            Scalar::Float64(_) => ElementKind::Float64,
            Scalar::Complex128(_) => ElementKind::Complex128,
        }
    }

    /// Convert into `to`, which must not rank below the scalar's own
    /// kind. Int64 → Float64 widens; a real value gains a zero
    /// imaginary part when lifted to Complex128.
    pub fn upcast(self, to: ElementKind) -> Scalar {
        debug_assert!(to >= self.kind(), "upcast must not narrow");
        match (self, to) {
            (Scalar::Int64(v), ElementKind::Float64) => Scalar::Float64(v as f64),
            (Scalar::Int64(v), ElementKind::Complex128) => {
                Scalar::Complex128(Complex64::new(v as f64, 0.0))
            }
            (Scalar::Float64(v), ElementKind::Complex128) => {
                Scalar::Complex128(Complex64::new(v, 0.0))
            }
            (s, _) => s,
        }
    }

    /// Convert into `to`, failing with a representability error when
    /// information would be lost: a nonzero imaginary part dropped
    /// into a real kind, or a fractional or out-of-range float forced
    /// into Int64.
    pub fn narrow(self, to: ElementKind) -> Result<Scalar, ArrayError> {
        if to >= self.kind() {
            return Ok(self.upcast(to));
        }
        match (self, to) {
            (Scalar::Complex128(z), t) => {
                if z.im != 0.0 {
                    return Err(representability(format!(
                        "cannot store complex value {}+{}i into {} slot",
                        z.re,
                        z.im,
                        t.name()
                    )));
                }
                Scalar::Float64(z.re).narrow(t)
            }
            (Scalar::Float64(v), ElementKind::Int64) => {
                // i64::MAX as f64 rounds up to 2^63, one past the
                // largest i64, so the upper bound is exclusive
                if v.fract() != 0.0 || v < i64::MIN as f64 || v >= i64::MAX as f64 {
                    return Err(representability(format!(
                        "cannot store {} into int64 slot",
                        v
                    )));
                }
                Ok(Scalar::Int64(v as i64))
            }
            (s, _) => Ok(s),
        }
    }

    /// True iff the element is nonzero (for complex: nonzero real or
    /// imaginary part). This is the truth rule of the boolean
    /// operators and of `all`/`any`.
    pub fn is_truthy(self) -> bool {
        match self {
            Scalar::Int64(v) => v != 0,
            Scalar::Float64(v) => v != 0.0,
            Scalar::Complex128(z) => z.re != 0.0 || z.im != 0.0,
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Scalar {
        Scalar::Int64(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Scalar {
        Scalar::Float64(v)
    }
}

impl From<Complex64> for Scalar {
    fn from(v: Complex64) -> Scalar {
        Scalar::Complex128(v)
    }
}

/// Total order over complex values: by real part, then by imaginary
/// part. Complex numbers have no natural order; this is the documented
/// order used by min/max reductions and the ordered relational
/// operators.
#[inline]
pub(crate) fn complex_cmp(a: Complex64, b: Complex64) -> Ordering {
    a.re.total_cmp(&b.re).then_with(|| a.im.total_cmp(&b.im))
}
