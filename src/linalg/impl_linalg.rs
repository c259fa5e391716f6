// Copyright 2025 numarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! QR-based kernels and the matrix product.
//!
//! The Householder factorization, reflector application and back
//! substitution are generic over one private scalar trait with a f64
//! and a Complex128 instantiation; integer matrices promote to
//! Float64 before entering any kernel except the matrix product,
//! which has a plain Int64 triple loop. The Float64/Complex128 matrix
//! products go through `matrixmultiply`'s dgemm/zgemm.

use std::ops::{Add, Div, Mul, Neg, Sub};

use matrixmultiply::{dgemm, zgemm, CGemmOption};
use num_complex::Complex64;
use num_traits::{One, Zero};

use crate::data_repr::try_alloc;
use crate::error::{domain_error, shape_mismatch, singular, ArrayError};
use crate::kind::ElementKind;
use crate::shape::OffsetIter;
use crate::NumArray;

/// Scalar operations the QR kernels need, over f64 and Complex128.
trait LinalgElem:
    Copy
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    fn conj(self) -> Self;
    fn modulus(self) -> f64;
    fn scale(self, s: f64) -> Self;
}

impl LinalgElem for f64 {
    fn conj(self) -> f64 {
        self
    }

    fn modulus(self) -> f64 {
        self.abs()
    }

    fn scale(self, s: f64) -> f64 {
        self * s
    }
}

impl LinalgElem for Complex64 {
    fn conj(self) -> Complex64 {
        Complex64::conj(&self)
    }

    fn modulus(self) -> f64 {
        self.norm()
    }

    fn scale(self, s: f64) -> Complex64 {
        self * s
    }
}

/// One Householder reflector `H = I - beta v vᴴ` acting on rows k..m.
struct Reflector<T> {
    v: Vec<T>,
    beta: f64,
}

/// Factor the row-major `m` × `n` matrix in place: on return the upper
/// triangle of `a` holds R (subdiagonal entries zeroed exactly) and
/// the returned reflectors compose Q = H₀ H₁ ⋯.
fn householder_factor<T: LinalgElem>(a: &mut [T], m: usize, n: usize) -> Vec<Reflector<T>> {
    let kmax = m.min(n);
    let mut refl = Vec::with_capacity(kmax);
    for k in 0..kmax {
        let mut norm2 = 0.0;
        for i in k..m {
            norm2 += a[i * n + k].modulus().powi(2);
        }
        let norm = norm2.sqrt();
        if norm == 0.0 {
            refl.push(Reflector {
                v: vec![T::zero(); m - k],
                beta: 0.0,
            });
            continue;
        }
        let x0 = a[k * n + k];
        // phase chosen so v = x - alpha e₁ never cancels
        let phase = if x0.modulus() == 0.0 {
            T::one()
        } else {
            x0.scale(1.0 / x0.modulus())
        };
        let alpha = -phase.scale(norm);
        let mut v = vec![T::zero(); m - k];
        v[0] = x0 - alpha;
        for i in k + 1..m {
            v[i - k] = a[i * n + k];
        }
        let vnorm2: f64 = v.iter().map(|t| t.modulus().powi(2)).sum();
        let beta = if vnorm2 == 0.0 { 0.0 } else { 2.0 / vnorm2 };
        for j in k + 1..n {
            let mut s = T::zero();
            for i in k..m {
                s = s + v[i - k].conj() * a[i * n + j];
            }
            let s = s.scale(beta);
            for i in k..m {
                a[i * n + j] = a[i * n + j] - v[i - k] * s;
            }
        }
        // column k maps to alpha e₁ exactly
        a[k * n + k] = alpha;
        for i in k + 1..m {
            a[i * n + k] = T::zero();
        }
        refl.push(Reflector { v, beta });
    }
    refl
}

/// Apply Qᴴ to the row-major `m` × `nrhs` matrix `b` in place.
/// Each reflector is Hermitian, so Qᴴ = H_{k-1} ⋯ H₀ applied in
/// factorization order.
fn apply_q_adjoint<T: LinalgElem>(refl: &[Reflector<T>], b: &mut [T], m: usize, nrhs: usize) {
    for (k, r) in refl.iter().enumerate() {
        if r.beta == 0.0 {
            continue;
        }
        for j in 0..nrhs {
            let mut s = T::zero();
            for i in k..m {
                s = s + r.v[i - k].conj() * b[i * nrhs + j];
            }
            let s = s.scale(r.beta);
            for i in k..m {
                b[i * nrhs + j] = b[i * nrhs + j] - r.v[i - k] * s;
            }
        }
    }
}

/// Accumulate the thin `m` × `kc` factor Q = H₀ H₁ ⋯ applied to the
/// leading columns of the identity.
fn form_q<T: LinalgElem>(refl: &[Reflector<T>], m: usize, kc: usize) -> Vec<T> {
    let mut q = vec![T::zero(); m * kc];
    for i in 0..kc {
        q[i * kc + i] = T::one();
    }
    for k in (0..refl.len()).rev() {
        let r = &refl[k];
        if r.beta == 0.0 {
            continue;
        }
        for j in 0..kc {
            let mut s = T::zero();
            for i in k..m {
                s = s + r.v[i - k].conj() * q[i * kc + j];
            }
            let s = s.scale(r.beta);
            for i in k..m {
                q[i * kc + j] = q[i * kc + j] - r.v[i - k] * s;
            }
        }
    }
    q
}

/// Least-squares/exact solve of the factored system: QR of `a`
/// (consumed), Qᴴ applied to `b`, then back substitution on the
/// leading `n` × `n` block of R.
///
/// Fails with `Singular` when an R diagonal entry falls below the
/// relative tolerance `eps · max(m, n) · max|R_ii|`.
fn qr_solve<T: LinalgElem>(
    mut a: Vec<T>,
    m: usize,
    n: usize,
    mut b: Vec<T>,
    nrhs: usize,
) -> Result<Vec<T>, ArrayError> {
    if m < n {
        return Err(shape_mismatch(format!(
            "underdetermined system: {} equations for {} unknowns",
            m, n
        )));
    }
    let refl = householder_factor(&mut a, m, n);
    apply_q_adjoint(&refl, &mut b, m, nrhs);
    let maxdiag = (0..n)
        .map(|i| a[i * n + i].modulus())
        .fold(0.0f64, f64::max);
    let tol = f64::EPSILON * m.max(n) as f64 * maxdiag;
    for i in 0..n {
        let d = a[i * n + i].modulus();
        if d == 0.0 || d <= tol {
            return Err(singular(format!(
                "triangular factor diagonal {} is {:e} (tolerance {:e})",
                i, d, tol
            )));
        }
    }
    let mut x = vec![T::zero(); n * nrhs];
    for j in 0..nrhs {
        for i in (0..n).rev() {
            let mut s = b[i * nrhs + j];
            for l in i + 1..n {
                s = s - a[i * n + l] * x[l * nrhs + j];
            }
            x[i * nrhs + j] = s / a[i * n + i];
        }
    }
    Ok(x)
}

impl NumArray {
    fn matrix_dims(&self) -> Result<(usize, usize), ArrayError> {
        if self.ndim() != 2 {
            return Err(shape_mismatch(format!(
                "expected a matrix, got rank {}",
                self.ndim()
            )));
        }
        Ok((self.dims()[0], self.dims()[1]))
    }

    /// Right-hand side dims: a vector is one implicit column.
    fn rhs_dims(&self) -> Result<(usize, usize, bool), ArrayError> {
        match self.ndim() {
            1 => Ok((self.dims()[0], 1, true)),
            2 => Ok((self.dims()[0], self.dims()[1], false)),
            r => Err(shape_mismatch(format!(
                "expected a matrix or vector, got rank {}",
                r
            ))),
        }
    }

    /// Elements in row-major order, upcast to f64 (real kinds only).
    fn to_vec_f64(&self) -> Result<Vec<f64>, ArrayError> {
        let mut out = try_alloc::<f64>(self.len())?;
        let mut it = OffsetIter::new(&self.dims, &[(self.base_offset(), &self.strides)]);
        let mut i = 0;
        while let Some(o) = it.next() {
            out[i] = self.data.get_f64(o[0] as usize);
            i += 1;
        }
        Ok(out)
    }

    /// Elements in row-major order, upcast to Complex128.
    fn to_vec_c128(&self) -> Result<Vec<Complex64>, ArrayError> {
        let mut out = try_alloc::<Complex64>(self.len())?;
        let mut it = OffsetIter::new(&self.dims, &[(self.base_offset(), &self.strides)]);
        let mut i = 0;
        while let Some(o) = it.next() {
            out[i] = self.data.get_c128(o[0] as usize);
            i += 1;
        }
        Ok(out)
    }

    fn to_vec_i64(&self) -> Result<Vec<i64>, ArrayError> {
        let mut out = try_alloc::<i64>(self.len())?;
        let mut it = OffsetIter::new(&self.dims, &[(self.base_offset(), &self.strides)]);
        let mut i = 0;
        while let Some(o) = it.next() {
            out[i] = self.data.get_i64(o[0] as usize);
            i += 1;
        }
        Ok(out)
    }

    /// Matrix product in the promoted kind. The left operand must be
    /// 2-D; the right operand may be a matrix or a vector (one
    /// implicit column, producing a vector).
    pub fn mat_mul(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        let (m, ka) = self.matrix_dims()?;
        let (kb, n, vec_rhs) = rhs.rhs_dims()?;
        if ka != kb {
            return Err(shape_mismatch(format!(
                "matrix product {:?} × {:?}",
                self.dims, rhs.dims
            )));
        }
        let kind = self.kind().promote(rhs.kind());
        let out = match kind {
            ElementKind::Int64 => {
                let a = self.to_vec_i64()?;
                let b = rhs.to_vec_i64()?;
                let mut c = try_alloc::<i64>(m * n)?;
                for i in 0..m {
                    for l in 0..ka {
                        let x = a[i * ka + l];
                        for j in 0..n {
                            c[i * n + j] =
                                c[i * n + j].wrapping_add(x.wrapping_mul(b[l * n + j]));
                        }
                    }
                }
                NumArray::from_shape_vec(&[m, n], c)?
            }
            ElementKind::Float64 => {
                let a = self.to_vec_f64()?;
                let b = rhs.to_vec_f64()?;
                let mut c = try_alloc::<f64>(m * n)?;
                unsafe {
                    dgemm(
                        m,
                        ka,
                        n,
                        1.0,
                        a.as_ptr(),
                        ka as isize,
                        1,
                        b.as_ptr(),
                        n as isize,
                        1,
                        0.0,
                        c.as_mut_ptr(),
                        n as isize,
                        1,
                    );
                }
                NumArray::from_shape_vec(&[m, n], c)?
            }
            ElementKind::Complex128 => {
                let a = self.to_vec_c128()?;
                let b = rhs.to_vec_c128()?;
                let mut c = try_alloc::<Complex64>(m * n)?;
                unsafe {
                    zgemm(
                        CGemmOption::Standard,
                        CGemmOption::Standard,
                        m,
                        ka,
                        n,
                        [1.0, 0.0],
                        a.as_ptr() as *const [f64; 2],
                        ka as isize,
                        1,
                        b.as_ptr() as *const [f64; 2],
                        n as isize,
                        1,
                        [0.0, 0.0],
                        c.as_mut_ptr() as *mut [f64; 2],
                        n as isize,
                        1,
                    );
                }
                NumArray::from_shape_vec(&[m, n], c)?
            }
        };
        if vec_rhs {
            out.reshape(&[m])
        } else {
            Ok(out)
        }
    }

    /// QR decomposition by Householder reflections: `a = q · r` with
    /// `q` orthogonal (unitary for complex input, thin: `m` × min(m,n))
    /// and `r` upper triangular (min(m,n) × `n`). Int64 input promotes
    /// to Float64.
    ///
    /// **Errors** with `ShapeMismatch` on non-2-D input.
    pub fn qr(&self) -> Result<(NumArray, NumArray), ArrayError> {
        let (m, n) = self.matrix_dims()?;
        let kc = m.min(n);
        match self.kind() {
            ElementKind::Complex128 => {
                let mut a = self.to_vec_c128()?;
                let refl = householder_factor(&mut a, m, n);
                let q = form_q(&refl, m, kc);
                a.truncate(kc * n);
                Ok((
                    NumArray::from_shape_vec(&[m, kc], q)?,
                    NumArray::from_shape_vec(&[kc, n], a)?,
                ))
            }
            _ => {
                let mut a = self.to_vec_f64()?;
                let refl = householder_factor(&mut a, m, n);
                let q = form_q(&refl, m, kc);
                a.truncate(kc * n);
                Ok((
                    NumArray::from_shape_vec(&[m, kc], q)?,
                    NumArray::from_shape_vec(&[kc, n], a)?,
                ))
            }
        }
    }

    /// Left division `self \ rhs`: solve `self · x = rhs` through the
    /// QR factorization — exact for square full-rank systems, least
    /// squares for overdetermined ones. The right-hand side may be a
    /// vector or a matrix of columns.
    ///
    /// **Errors** with `Singular` when the triangular factor's
    /// diagonal falls below a relative tolerance, `ShapeMismatch` for
    /// underdetermined systems or mismatched heights.
    pub fn solve_left(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        let (m, n) = self.matrix_dims()?;
        let (bm, nrhs, vec_rhs) = rhs.rhs_dims()?;
        if bm != m {
            return Err(shape_mismatch(format!(
                "coefficient matrix has {} rows but right-hand side has {}",
                m, bm
            )));
        }
        let kind = self
            .kind()
            .promote(rhs.kind())
            .promote(ElementKind::Float64);
        let out = match kind {
            ElementKind::Complex128 => {
                let x = qr_solve(self.to_vec_c128()?, m, n, rhs.to_vec_c128()?, nrhs)?;
                NumArray::from_shape_vec(&[n, nrhs], x)?
            }
            _ => {
                let x = qr_solve(self.to_vec_f64()?, m, n, rhs.to_vec_f64()?, nrhs)?;
                NumArray::from_shape_vec(&[n, nrhs], x)?
            }
        };
        if vec_rhs {
            out.reshape(&[n])
        } else {
            Ok(out)
        }
    }

    /// Right division `self / rhs`: solve `x · rhs = self` as
    /// `(rhsᴴ \ selfᴴ)ᴴ`. Both operands must be 2-D.
    pub fn solve_right(&self, rhs: &NumArray) -> Result<NumArray, ArrayError> {
        self.matrix_dims()?;
        rhs.matrix_dims()?;
        let xt = rhs.adjoint()?.solve_left(&self.adjoint()?)?;
        xt.adjoint()
    }

    /// Matrix power by repeated squaring (O(log e) products). Exponent
    /// 0 yields the identity in the array's kind; negative exponents
    /// invert through the solve kernel first (promoting Int64 to
    /// Float64).
    ///
    /// **Errors** with `ShapeMismatch` on non-square input and
    /// `Singular` when a negative power meets a singular matrix.
    pub fn matrix_pow(&self, e: i64) -> Result<NumArray, ArrayError> {
        let (m, n) = self.matrix_dims()?;
        if m != n {
            return Err(shape_mismatch(format!(
                "matrix power of a {} × {} matrix",
                m, n
            )));
        }
        if e == 0 {
            return NumArray::eye(n, n, self.kind());
        }
        if e < 0 {
            let e = e.checked_neg().ok_or_else(|| {
                domain_error(format!("matrix power exponent {} out of range", e))
            })?;
            let kind = self.kind().promote(ElementKind::Float64);
            let inv = self.solve_left(&NumArray::eye(n, n, kind)?)?;
            return inv.matrix_pow(e);
        }
        let mut base = self.fast_copy()?;
        let mut e = e as u64;
        let mut acc: Option<NumArray> = None;
        while e > 0 {
            if e & 1 == 1 {
                acc = Some(match acc {
                    None => base.fast_copy()?,
                    Some(r) => r.mat_mul(&base)?,
                });
            }
            e >>= 1;
            if e > 0 {
                base = base.mat_mul(&base)?;
            }
        }
        Ok(acc.expect("nonzero exponent leaves at least one factor"))
    }
}

/// Result of a least-squares fit: the coefficient vector (intercept
/// first), the residual vector, and the residual degrees of freedom.
#[derive(Clone, Debug)]
pub struct LinReg {
    pub coefficients: NumArray,
    pub residuals: NumArray,
    pub dof: usize,
}

/// Fit `y ≈ c₀ + c₁·x₁ + … + cₚ·xₚ` by least squares over the QR
/// path. `x` is a vector of one regressor or an `m` × `p` matrix of
/// regressor columns; `y` is the observation vector. An intercept
/// column of ones is prepended to the design matrix.
pub fn linreg(x: &NumArray, y: &NumArray) -> Result<LinReg, ArrayError> {
    let (m, p) = match x.ndim() {
        1 => (x.dims()[0], 1),
        2 => (x.dims()[0], x.dims()[1]),
        r => {
            return Err(shape_mismatch(format!(
                "regressors must be a vector or matrix, got rank {}",
                r
            )))
        }
    };
    if y.ndim() != 1 || y.dims()[0] != m {
        return Err(shape_mismatch(format!(
            "expected {} observations, got shape {:?}",
            m,
            y.dims()
        )));
    }
    if m < p + 1 {
        return Err(domain_error(format!(
            "{} observations cannot determine {} coefficients",
            m,
            p + 1
        )));
    }
    let kind = x
        .kind()
        .promote(y.kind())
        .promote(ElementKind::Float64);
    let design = match kind {
        ElementKind::Complex128 => {
            let xv = x.to_vec_c128()?;
            let mut d = try_alloc::<Complex64>(m * (p + 1))?;
            for i in 0..m {
                d[i * (p + 1)] = Complex64::new(1.0, 0.0);
                d[i * (p + 1) + 1..i * (p + 1) + 1 + p]
                    .copy_from_slice(&xv[i * p..(i + 1) * p]);
            }
            NumArray::from_shape_vec(&[m, p + 1], d)?
        }
        _ => {
            let xv = x.to_vec_f64()?;
            let mut d = try_alloc::<f64>(m * (p + 1))?;
            for i in 0..m {
                d[i * (p + 1)] = 1.0;
                d[i * (p + 1) + 1..i * (p + 1) + 1 + p]
                    .copy_from_slice(&xv[i * p..(i + 1) * p]);
            }
            NumArray::from_shape_vec(&[m, p + 1], d)?
        }
    };
    let coefficients = design.solve_left(y)?;
    let fitted = design.mat_mul(&coefficients)?;
    let residuals = y.minus(&fitted)?;
    Ok(LinReg {
        coefficients,
        residuals,
        dof: m - (p + 1),
    })
}
