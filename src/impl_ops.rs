// Copyright 2025 numarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The elementwise operation engine: kind-promoted arithmetic,
//! relational and boolean operators, the transcendental family,
//! complex accessors, and the in-place assignment variants.
//!
//! Every binary operation promotes both operands to their common kind
//! (optionally floored by the operation itself, e.g. division never
//! computes in int64), broadcasts the shapes, and fills a fresh buffer
//! of the broadcast shape. In-place variants keep the left operand's
//! kind and narrow computed values into it.

use std::cmp::Ordering;

use num_complex::Complex64;

use crate::data_repr::{try_alloc, Elements, SharedBuffer};
use crate::error::{domain_error, shape_mismatch, ArrayError};
use crate::kind::{complex_cmp, ElementKind, Scalar};
use crate::shape::{broadcast_shape, size_of_shape, OffsetIter};
use crate::NumArray;

impl NumArray {
    /// Generic promoted binary map. `min_kind` floors the computation
    /// kind (`Int64` = no floor). Exactly one of the three closures
    /// runs, selected by the promoted kind.
    fn binary_elementwise(
        &self,
        rhs: &NumArray,
        min_kind: ElementKind,
        fi: impl Fn(i64, i64) -> Result<i64, ArrayError>,
        ff: impl Fn(f64, f64) -> Result<f64, ArrayError>,
        fc: impl Fn(Complex64, Complex64) -> Result<Complex64, ArrayError>,
    ) -> Result<NumArray, ArrayError> {
        let kind = self.kind().promote(rhs.kind()).promote(min_kind);
        let dims = broadcast_shape(&self.dims, &rhs.dims)?;
        let n = size_of_shape(&dims);
        let ls = self.strides_for(&dims);
        let rs = rhs.strides_for(&dims);
        let mut it = OffsetIter::new(
            &dims,
            &[(self.base_offset(), &ls), (rhs.base_offset(), &rs)],
        );
        let elements = match kind {
            ElementKind::Int64 => {
                let mut out = try_alloc::<i64>(n)?;
                let mut i = 0;
                while let Some(o) = it.next() {
                    out[i] = fi(
                        self.data.get_i64(o[0] as usize),
                        rhs.data.get_i64(o[1] as usize),
                    )?;
                    i += 1;
                }
                Elements::Int64(out)
            }
            ElementKind::Float64 => {
                let mut out = try_alloc::<f64>(n)?;
                let mut i = 0;
                while let Some(o) = it.next() {
                    out[i] = ff(
                        self.data.get_f64(o[0] as usize),
                        rhs.data.get_f64(o[1] as usize),
                    )?;
                    i += 1;
                }
                Elements::Float64(out)
            }
            ElementKind::Complex128 => {
                let mut out = try_alloc::<Complex64>(n)?;
                let mut i = 0;
                while let Some(o) = it.next() {
                    out[i] = fc(
                        self.data.get_c128(o[0] as usize),
                        rhs.data.get_c128(o[1] as usize),
                    )?;
                    i += 1;
                }
                Elements::Complex128(out)
            }
        };
        Ok(NumArray::from_parts(SharedBuffer::new(elements), dims))
    }

    /// Ordered comparison in the operands' common kind, producing an
    /// Int64 array of 0/1. Complex operands compare in the documented
    /// lexicographic (real, then imaginary) order.
    fn binary_relational(
        &self,
        rhs: &NumArray,
        fi: impl Fn(i64, i64) -> bool,
        ff: impl Fn(f64, f64) -> bool,
        fc: impl Fn(Complex64, Complex64) -> bool,
    ) -> Result<NumArray, ArrayError> {
        let kind = self.kind().promote(rhs.kind());
        let dims = broadcast_shape(&self.dims, &rhs.dims)?;
        let n = size_of_shape(&dims);
        let ls = self.strides_for(&dims);
        let rs = rhs.strides_for(&dims);
        let mut it = OffsetIter::new(
            &dims,
            &[(self.base_offset(), &ls), (rhs.base_offset(), &rs)],
        );
        let mut out = try_alloc::<i64>(n)?;
        let mut i = 0;
        while let Some(o) = it.next() {
            let (lo, ro) = (o[0] as usize, o[1] as usize);
            let truth = match kind {
                ElementKind::Int64 => fi(self.data.get_i64(lo), rhs.data.get_i64(ro)),
                ElementKind::Float64 => ff(self.data.get_f64(lo), rhs.data.get_f64(ro)),
                ElementKind::Complex128 => fc(self.data.get_c128(lo), rhs.data.get_c128(ro)),
            };
            out[i] = truth as i64;
            i += 1;
        }
        Ok(NumArray::from_parts(
            SharedBuffer::new(Elements::Int64(out)),
            dims,
        ))
    }

    /// Boolean combination of element truth values (nonzero = true),
    /// producing an Int64 array of 0/1.
    fn binary_boolean(
        &self,
        rhs: &NumArray,
        f: impl Fn(bool, bool) -> bool,
    ) -> Result<NumArray, ArrayError> {
        let dims = broadcast_shape(&self.dims, &rhs.dims)?;
        let n = size_of_shape(&dims);
        let ls = self.strides_for(&dims);
        let rs = rhs.strides_for(&dims);
        let mut it = OffsetIter::new(
            &dims,
            &[(self.base_offset(), &ls), (rhs.base_offset(), &rs)],
        );
        let mut out = try_alloc::<i64>(n)?;
        let mut i = 0;
        while let Some(o) = it.next() {
            let a = self.data.get(o[0] as usize).is_truthy();
            let b = rhs.data.get(o[1] as usize).is_truthy();
            out[i] = f(a, b) as i64;
            i += 1;
        }
        Ok(NumArray::from_parts(
            SharedBuffer::new(Elements::Int64(out)),
            dims,
        ))
    }

    /// Generic promoted unary map.
    fn unary_elementwise(
        &self,
        min_kind: ElementKind,
        fi: impl Fn(i64) -> Result<i64, ArrayError>,
        ff: impl Fn(f64) -> Result<f64, ArrayError>,
        fc: impl Fn(Complex64) -> Result<Complex64, ArrayError>,
    ) -> Result<NumArray, ArrayError> {
        let kind = self.kind().promote(min_kind);
        let n = self.len();
        let mut it = OffsetIter::new(&self.dims, &[(self.base_offset(), &self.strides)]);
        let elements = match kind {
            ElementKind::Int64 => {
                let mut out = try_alloc::<i64>(n)?;
                let mut i = 0;
                while let Some(o) = it.next() {
                    out[i] = fi(self.data.get_i64(o[0] as usize))?;
                    i += 1;
                }
                Elements::Int64(out)
            }
            ElementKind::Float64 => {
                let mut out = try_alloc::<f64>(n)?;
                let mut i = 0;
                while let Some(o) = it.next() {
                    out[i] = ff(self.data.get_f64(o[0] as usize))?;
                    i += 1;
                }
                Elements::Float64(out)
            }
            ElementKind::Complex128 => {
                let mut out = try_alloc::<Complex64>(n)?;
                let mut i = 0;
                while let Some(o) = it.next() {
                    out[i] = fc(self.data.get_c128(o[0] as usize))?;
                    i += 1;
                }
                Elements::Complex128(out)
            }
        };
        Ok(NumArray::from_parts(SharedBuffer::new(elements), self.dims.clone()))
    }

    /// Map a complex array to a Float64 array of the same shape.
    fn map_complex_to_real(&self, f: impl Fn(Complex64) -> f64) -> Result<NumArray, ArrayError> {
        let mut out = try_alloc::<f64>(self.len())?;
        let mut it = OffsetIter::new(&self.dims, &[(self.base_offset(), &self.strides)]);
        let mut i = 0;
        while let Some(o) = it.next() {
            out[i] = f(self.data.get_c128(o[0] as usize));
            i += 1;
        }
        Ok(NumArray::from_parts(
            SharedBuffer::new(Elements::Float64(out)),
            self.dims.clone(),
        ))
    }

    /// Real-or-complex unary map used by the transcendental family:
    /// Int64 promotes to Float64; real inputs outside `domain` fail
    /// with `DomainError` (complex promotion is never implicit).
    fn map_float(
        &self,
        name: &str,
        ff: fn(f64) -> f64,
        fc: fn(Complex64) -> Complex64,
        domain: impl Fn(f64) -> bool,
    ) -> Result<NumArray, ArrayError> {
        self.unary_elementwise(
            ElementKind::Float64,
            |_| unreachable!(),
            |x| {
                if domain(x) {
                    Ok(ff(x))
                } else {
                    Err(domain_error(format!(
                        "{} of {} has no real result",
                        name, x
                    )))
                }
            },
            |z| Ok(fc(z)),
        )
    }
}

macro_rules! map_float_fns {
    ($($(#[$meta:meta])* $name:ident => $domain:expr;)+) => {
        impl NumArray {
            $(
                $(#[$meta])*
                pub fn $name(&self) -> Result<NumArray, ArrayError> {
                    self.map_float(stringify!($name), f64::$name, Complex64::$name, $domain)
                }
            )+
        }
    };
}

map_float_fns! {
    /// Elementwise sine.
    sin => |_| true;
    /// Elementwise cosine.
    cos => |_| true;
    /// Elementwise tangent.
    tan => |_| true;
    /// Elementwise arcsine; real arguments must lie in [-1, 1].
    asin => |x: f64| (-1.0..=1.0).contains(&x);
    /// Elementwise arccosine; real arguments must lie in [-1, 1].
    acos => |x: f64| (-1.0..=1.0).contains(&x);
    /// Elementwise arctangent.
    atan => |_| true;
    /// Elementwise hyperbolic sine.
    sinh => |_| true;
    /// Elementwise hyperbolic cosine.
    cosh => |_| true;
    /// Elementwise hyperbolic tangent.
    tanh => |_| true;
    /// Elementwise inverse hyperbolic sine.
    asinh => |_| true;
    /// Elementwise inverse hyperbolic cosine; real arguments must be ≥ 1.
    acosh => |x: f64| x >= 1.0;
    /// Elementwise inverse hyperbolic tangent; real arguments must lie in (-1, 1).
    atanh => |x: f64| x > -1.0 && x < 1.0;
    /// Elementwise exponential.
    exp => |_| true;
    /// Elementwise square root; real arguments must be non-negative.
    sqrt => |x: f64| x >= 0.0;
}

impl NumArray {
    /// Elementwise natural logarithm; real arguments must be positive.
    pub fn log(&self) -> Result<NumArray, ArrayError> {
        self.map_float("log", f64::ln, Complex64::ln, |x| x > 0.0)
    }

    /// Elementwise addition in the promoted kind. Int64 wraps on
    /// overflow (two's complement).
    pub fn plus(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_elementwise(
            rhs,
            ElementKind::Int64,
            |a, b| Ok(a.wrapping_add(b)),
            |a, b| Ok(a + b),
            |a, b| Ok(a + b),
        )
    }

    /// Elementwise subtraction in the promoted kind.
    pub fn minus(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_elementwise(
            rhs,
            ElementKind::Int64,
            |a, b| Ok(a.wrapping_sub(b)),
            |a, b| Ok(a - b),
            |a, b| Ok(a - b),
        )
    }

    /// Elementwise multiplication in the promoted kind.
    pub fn times(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_elementwise(
            rhs,
            ElementKind::Int64,
            |a, b| Ok(a.wrapping_mul(b)),
            |a, b| Ok(a * b),
            |a, b| Ok(a * b),
        )
    }

    /// Elementwise right division `self ./ rhs`. Never computes in
    /// Int64; division by zero follows IEEE-754 (±inf, NaN) for real
    /// operands and complex propagation for complex ones.
    pub fn rdivide(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_elementwise(
            rhs,
            ElementKind::Float64,
            |_, _| unreachable!(),
            |a, b| Ok(a / b),
            |a, b| Ok(a / b),
        )
    }

    /// Elementwise left division `self .\ rhs`, i.e. `rhs ./ self`.
    pub fn ldivide(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        rhs.rdivide(self)
    }

    /// Elementwise power. Never computes in Int64 (negative and
    /// fractional exponents are representable); a negative real base
    /// with a non-integer exponent is a `DomainError`.
    pub fn pow(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_elementwise(
            rhs,
            ElementKind::Float64,
            |_, _| unreachable!(),
            |a, b| {
                if a < 0.0 && b.fract() != 0.0 {
                    return Err(domain_error(format!(
                        "{} raised to non-integer power {} has no real result",
                        a, b
                    )));
                }
                Ok(a.powf(b))
            },
            |a, b| Ok(a.powc(b)),
        )
    }

    /// Elementwise remainder. Int64 remainder by zero and complex
    /// operands are `DomainError`s; Float64 follows IEEE `%`.
    pub fn remainder(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_elementwise(
            rhs,
            ElementKind::Int64,
            |a, b| {
                if b == 0 {
                    return Err(domain_error("integer remainder by zero"));
                }
                Ok(a.wrapping_rem(b))
            },
            |a, b| Ok(a % b),
            |_, _| Err(domain_error("remainder is not defined for complex operands")),
        )
    }

    /// Elementwise minimum; complex values use the lexicographic order.
    pub fn minimum(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_elementwise(
            rhs,
            ElementKind::Int64,
            |a, b| Ok(a.min(b)),
            |a, b| Ok(a.min(b)),
            |a, b| Ok(if complex_cmp(b, a) == Ordering::Less { b } else { a }),
        )
    }

    /// Elementwise maximum; complex values use the lexicographic order.
    pub fn maximum(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_elementwise(
            rhs,
            ElementKind::Int64,
            |a, b| Ok(a.max(b)),
            |a, b| Ok(a.max(b)),
            |a, b| Ok(if complex_cmp(b, a) == Ordering::Greater { b } else { a }),
        )
    }

    /// Elementwise negation, kind-preserving.
    pub fn neg(&self) -> Result<NumArray, ArrayError> {
        self.unary_elementwise(
            ElementKind::Int64,
            |a| Ok(a.wrapping_neg()),
            |a| Ok(-a),
            |a| Ok(-a),
        )
    }

    /// Elementwise complex conjugate, kind-preserving (identity for
    /// real kinds).
    pub fn conj(&self) -> Result<NumArray, ArrayError> {
        self.unary_elementwise(ElementKind::Int64, |a| Ok(a), |a| Ok(a), |a| Ok(a.conj()))
    }

    /// Elementwise absolute value. Complex input produces a Float64
    /// array of moduli; real kinds are preserved.
    pub fn abs(&self) -> Result<NumArray, ArrayError> {
        match self.kind() {
            ElementKind::Complex128 => self.map_complex_to_real(|z| z.norm()),
            _ => self.unary_elementwise(
                ElementKind::Int64,
                |a| Ok(a.wrapping_abs()),
                |a| Ok(a.abs()),
                |_| unreachable!(),
            ),
        }
    }

    /// Elementwise sign: -1/0/1 for real kinds (kind-preserving);
    /// `z / |z|` for complex input (0 at the origin).
    pub fn sign(&self) -> Result<NumArray, ArrayError> {
        self.unary_elementwise(
            ElementKind::Int64,
            |a| Ok(a.signum()),
            |a| Ok(if a > 0.0 { 1.0 } else if a < 0.0 { -1.0 } else { 0.0 }),
            |z| {
                let r = z.norm();
                Ok(if r == 0.0 { Complex64::new(0.0, 0.0) } else { z / r })
            },
        )
    }

    /// Real part: identity copy for real kinds, Float64 array of real
    /// parts for complex input.
    pub fn real(&self) -> Result<NumArray, ArrayError> {
        match self.kind() {
            ElementKind::Complex128 => self.map_complex_to_real(|z| z.re),
            _ => self.fast_copy(),
        }
    }

    /// Imaginary part: all zeros (in the input kind) for real kinds,
    /// Float64 array of imaginary parts for complex input.
    pub fn imag(&self) -> Result<NumArray, ArrayError> {
        match self.kind() {
            ElementKind::Complex128 => self.map_complex_to_real(|z| z.im),
            kind => NumArray::zeros(&self.dims, kind),
        }
    }

    /// Complex argument as a Float64 array. Negative reals map to π,
    /// non-negative reals to 0.
    pub fn arg(&self) -> Result<NumArray, ArrayError> {
        match self.kind() {
            ElementKind::Complex128 => self.map_complex_to_real(|z| z.arg()),
            _ => self.unary_elementwise(
                ElementKind::Float64,
                |_| unreachable!(),
                |a| Ok(0f64.atan2(a)),
                |_| unreachable!(),
            ),
        }
    }

    /// Elementwise `>` producing Int64 0/1.
    pub fn greater(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_relational(
            rhs,
            |a, b| a > b,
            |a, b| a > b,
            |a, b| complex_cmp(a, b) == Ordering::Greater,
        )
    }

    /// Elementwise `<` producing Int64 0/1.
    pub fn lesser(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_relational(
            rhs,
            |a, b| a < b,
            |a, b| a < b,
            |a, b| complex_cmp(a, b) == Ordering::Less,
        )
    }

    /// Elementwise `>=` producing Int64 0/1.
    pub fn greater_equal(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_relational(
            rhs,
            |a, b| a >= b,
            |a, b| a >= b,
            |a, b| complex_cmp(a, b) != Ordering::Less,
        )
    }

    /// Elementwise `<=` producing Int64 0/1.
    pub fn lesser_equal(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_relational(
            rhs,
            |a, b| a <= b,
            |a, b| a <= b,
            |a, b| complex_cmp(a, b) != Ordering::Greater,
        )
    }

    /// Elementwise `==` producing Int64 0/1.
    pub fn equal(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_relational(rhs, |a, b| a == b, |a, b| a == b, |a, b| a == b)
    }

    /// Elementwise `!=` producing Int64 0/1.
    pub fn unequal(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_relational(rhs, |a, b| a != b, |a, b| a != b, |a, b| a != b)
    }

    /// Elementwise logical and (nonzero = true), producing Int64 0/1.
    pub fn and(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_boolean(rhs, |a, b| a && b)
    }

    /// Elementwise logical or (nonzero = true), producing Int64 0/1.
    pub fn or(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.binary_boolean(rhs, |a, b| a || b)
    }

    /// Elementwise logical not (nonzero = true), producing Int64 0/1.
    pub fn not(&self) -> Result<NumArray, ArrayError> {
        let mut out = try_alloc::<i64>(self.len())?;
        let mut it = OffsetIter::new(&self.dims, &[(self.base_offset(), &self.strides)]);
        let mut i = 0;
        while let Some(o) = it.next() {
            out[i] = !self.data.get(o[0] as usize).is_truthy() as i64;
            i += 1;
        }
        Ok(NumArray::from_parts(
            SharedBuffer::new(Elements::Int64(out)),
            self.dims.clone(),
        ))
    }

    /// Same-kind, same-shape, unit-stride addition fast path; falls
    /// back to [`plus`](NumArray::plus) when the preconditions do not
    /// hold.
    pub fn fast_add(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        if self.kind() != rhs.kind()
            || self.dims != rhs.dims
            || !self.is_contiguous()
            || !rhs.is_contiguous()
        {
            return self.plus(rhs);
        }
        let n = self.len();
        let (lo, ro) = (self.offset, rhs.offset);
        let elements = match (self.data.elements(), rhs.data.elements()) {
            (Elements::Int64(a), Elements::Int64(b)) => {
                let mut out = try_alloc::<i64>(n)?;
                for ((o, &x), &y) in out.iter_mut().zip(&a[lo..lo + n]).zip(&b[ro..ro + n]) {
                    *o = x.wrapping_add(y);
                }
                Elements::Int64(out)
            }
            (Elements::Float64(a), Elements::Float64(b)) => {
                let mut out = try_alloc::<f64>(n)?;
                for ((o, &x), &y) in out.iter_mut().zip(&a[lo..lo + n]).zip(&b[ro..ro + n]) {
                    *o = x + y;
                }
                Elements::Float64(out)
            }
            (Elements::Complex128(a), Elements::Complex128(b)) => {
                let mut out = try_alloc::<Complex64>(n)?;
                for ((o, &x), &y) in out.iter_mut().zip(&a[lo..lo + n]).zip(&b[ro..ro + n]) {
                    *o = x + y;
                }
                Elements::Complex128(out)
            }
            _ => unreachable!("kinds checked equal above"),
        };
        Ok(NumArray::from_parts(
            SharedBuffer::new(elements),
            self.dims.clone(),
        ))
    }
}

// In-place assignment variants. The right-hand side must broadcast to
// the left operand's shape (the left shape never grows) and computed
// values are narrowed back into the left operand's kind. The full
// computation is validated before the buffer is unshared and written,
// so a failure leaves the left operand in its pre-call state.
impl NumArray {
    fn binary_assign(
        &mut self,
        rhs: &NumArray,
        min_kind: ElementKind,
        fi: impl Fn(i64, i64) -> Result<i64, ArrayError>,
        ff: impl Fn(f64, f64) -> Result<f64, ArrayError>,
        fc: impl Fn(Complex64, Complex64) -> Result<Complex64, ArrayError>,
    ) -> Result<(), ArrayError> {
        if broadcast_shape(&self.dims, &rhs.dims)? != self.dims {
            return Err(shape_mismatch(format!(
                "cannot assign broadcast of {:?} into shape {:?}",
                rhs.dims, self.dims
            )));
        }
        let kind = self.kind().promote(rhs.kind()).promote(min_kind);
        let own = self.kind();
        let rs = rhs.strides_for(&self.dims);

        let eval = |lo: usize, ro: usize| -> Result<Scalar, ArrayError> {
            let v = match kind {
                ElementKind::Int64 => {
                    Scalar::Int64(fi(self.data.get_i64(lo), rhs.data.get_i64(ro))?)
                }
                ElementKind::Float64 => {
                    Scalar::Float64(ff(self.data.get_f64(lo), rhs.data.get_f64(ro))?)
                }
                ElementKind::Complex128 => {
                    Scalar::Complex128(fc(self.data.get_c128(lo), rhs.data.get_c128(ro))?)
                }
            };
            v.narrow(own)
        };

        // validation pass: surface domain and representability errors
        // while the buffer is still untouched
        {
            let mut it = OffsetIter::new(
                &self.dims,
                &[(self.base_offset(), &self.strides), (rhs.base_offset(), &rs)],
            );
            while let Some(o) = it.next() {
                eval(o[0] as usize, o[1] as usize)?;
            }
        }

        self.ensure_unique()?;
        let dims = self.dims.clone();
        let ls = self.strides.clone();
        let mut it = OffsetIter::new(
            &dims,
            &[(self.base_offset(), &ls), (rhs.base_offset(), &rs)],
        );
        while let Some(o) = it.next() {
            let (lo, ro) = (o[0] as usize, o[1] as usize);
            let v = match kind {
                ElementKind::Int64 => {
                    Scalar::Int64(fi(self.data.get_i64(lo), rhs.data.get_i64(ro))?)
                }
                ElementKind::Float64 => {
                    Scalar::Float64(ff(self.data.get_f64(lo), rhs.data.get_f64(ro))?)
                }
                ElementKind::Complex128 => {
                    Scalar::Complex128(fc(self.data.get_c128(lo), rhs.data.get_c128(ro))?)
                }
            };
            let v = v.narrow(own)?;
            self.data.put(lo, v);
        }
        Ok(())
    }

    /// Plain in-place assignment: overwrite with the broadcast of
    /// `rhs`, narrowed into this array's kind.
    pub fn assign(&mut self, rhs: &NumArray) -> Result<(), ArrayError> {
        self.binary_assign(
            rhs,
            ElementKind::Int64,
            |_, b| Ok(b),
            |_, b| Ok(b),
            |_, b| Ok(b),
        )
    }

    /// In-place `+=`.
    pub fn plus_assign(&mut self, rhs: &NumArray) -> Result<(), ArrayError> {
        self.binary_assign(
            rhs,
            ElementKind::Int64,
            |a, b| Ok(a.wrapping_add(b)),
            |a, b| Ok(a + b),
            |a, b| Ok(a + b),
        )
    }

    /// In-place `-=`.
    pub fn minus_assign(&mut self, rhs: &NumArray) -> Result<(), ArrayError> {
        self.binary_assign(
            rhs,
            ElementKind::Int64,
            |a, b| Ok(a.wrapping_sub(b)),
            |a, b| Ok(a - b),
            |a, b| Ok(a - b),
        )
    }

    /// In-place `*=` (elementwise).
    pub fn times_assign(&mut self, rhs: &NumArray) -> Result<(), ArrayError> {
        self.binary_assign(
            rhs,
            ElementKind::Int64,
            |a, b| Ok(a.wrapping_mul(b)),
            |a, b| Ok(a * b),
            |a, b| Ok(a * b),
        )
    }

    /// In-place elementwise right division `self ./= rhs`. Computes in
    /// at least Float64; for an Int64 left operand the quotient must
    /// be exactly representable.
    pub fn rdivide_assign(&mut self, rhs: &NumArray) -> Result<(), ArrayError> {
        self.binary_assign(
            rhs,
            ElementKind::Float64,
            |_, _| unreachable!(),
            |a, b| Ok(a / b),
            |a, b| Ok(a / b),
        )
    }

    /// In-place elementwise left division `self .\= rhs` (each element
    /// becomes `rhs / self`).
    pub fn ldivide_assign(&mut self, rhs: &NumArray) -> Result<(), ArrayError> {
        self.binary_assign(
            rhs,
            ElementKind::Float64,
            |_, _| unreachable!(),
            |a, b| Ok(b / a),
            |a, b| Ok(b / a),
        )
    }

    /// In-place elementwise power.
    pub fn pow_assign(&mut self, rhs: &NumArray) -> Result<(), ArrayError> {
        self.binary_assign(
            rhs,
            ElementKind::Float64,
            |_, _| unreachable!(),
            |a, b| {
                if a < 0.0 && b.fract() != 0.0 {
                    return Err(domain_error(format!(
                        "{} raised to non-integer power {} has no real result",
                        a, b
                    )));
                }
                Ok(a.powf(b))
            },
            |a, b| Ok(a.powc(b)),
        )
    }
}
