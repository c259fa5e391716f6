use approx::assert_abs_diff_eq;
use itertools::Itertools;
use numarray::{linreg, Complex64, ElementKind, ErrorKind, NumArray, Scalar};

fn f64_of(s: Scalar) -> f64 {
    match s {
        Scalar::Int64(v) => v as f64,
        Scalar::Float64(v) => v,
        Scalar::Complex128(_) => panic!("unexpected complex scalar"),
    }
}

fn c128_of(s: Scalar) -> Complex64 {
    match s {
        Scalar::Int64(v) => Complex64::new(v as f64, 0.0),
        Scalar::Float64(v) => Complex64::new(v, 0.0),
        Scalar::Complex128(z) => z,
    }
}

fn assert_close(a: &NumArray, b: &NumArray, eps: f64) {
    assert_eq!(a.dims(), b.dims());
    let d = a.minus(b).unwrap();
    let mx = f64_of(d.abs().unwrap().max().unwrap());
    assert!(mx <= eps, "max deviation {} exceeds {}", mx, eps);
}

#[test]
fn mat_mul_int_stays_int() {
    let a = NumArray::from_shape_vec(&[2, 2], vec![1i64, 2, 3, 4]).unwrap();
    let b = NumArray::from_shape_vec(&[2, 2], vec![5i64, 6, 7, 8]).unwrap();
    let c = a.mat_mul(&b).unwrap();
    assert_eq!(c.kind(), ElementKind::Int64);
    assert_eq!(c.get(&[0, 0]).unwrap(), Scalar::Int64(19));
    assert_eq!(c.get(&[0, 1]).unwrap(), Scalar::Int64(22));
    assert_eq!(c.get(&[1, 0]).unwrap(), Scalar::Int64(43));
    assert_eq!(c.get(&[1, 1]).unwrap(), Scalar::Int64(50));
}

#[test]
fn mat_mul_float_and_shapes() {
    let a = NumArray::from_shape_vec(&[2, 3], vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let b = NumArray::from_shape_vec(&[3, 2], vec![7.0f64, 8.0, 9.0, 10.0, 11.0, 12.0]).unwrap();
    let c = a.mat_mul(&b).unwrap();
    assert_eq!(c.dims(), &[2, 2]);
    assert_abs_diff_eq!(f64_of(c.get(&[0, 0]).unwrap()), 58.0, epsilon = 1e-12);
    assert_abs_diff_eq!(f64_of(c.get(&[1, 1]).unwrap()), 154.0, epsilon = 1e-12);

    // a vector right side is one implicit column, producing a vector
    let v = NumArray::from_shape_vec(&[3], vec![1.0f64, 0.0, -1.0]).unwrap();
    let av = a.mat_mul(&v).unwrap();
    assert_eq!(av.dims(), &[2]);
    assert_abs_diff_eq!(f64_of(av.get(&[0]).unwrap()), -2.0, epsilon = 1e-12);

    let bad = NumArray::from_shape_vec(&[2], vec![1.0f64, 2.0]).unwrap();
    assert_eq!(a.mat_mul(&bad).unwrap_err().kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn mat_mul_complex() {
    let i = Complex64::new(0.0, 1.0);
    let a = NumArray::from_shape_vec(&[1, 2], vec![i, Complex64::new(1.0, 0.0)]).unwrap();
    let b = NumArray::from_shape_vec(&[2, 1], vec![i, i]).unwrap();
    // i*i + 1*i = -1 + i
    let c = a.mat_mul(&b).unwrap();
    let z = c128_of(c.get(&[0, 0]).unwrap());
    assert_abs_diff_eq!(z.re, -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(z.im, 1.0, epsilon = 1e-12);
}

#[test]
fn qr_reconstructs_the_matrix() {
    let m = NumArray::from_shape_vec(
        &[3, 3],
        vec![12.0f64, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0],
    )
    .unwrap();
    let (q, r) = m.qr().unwrap();
    assert_eq!(q.dims(), &[3, 3]);
    assert_eq!(r.dims(), &[3, 3]);
    assert_close(&q.mat_mul(&r).unwrap(), &m, 1e-9);

    // R is upper triangular
    for (i, j) in (0..3).cartesian_product(0..3) {
        if i > j {
            assert_abs_diff_eq!(f64_of(r.get(&[i, j]).unwrap()), 0.0, epsilon = 1e-12);
        }
    }

    // Q has orthonormal columns
    let qtq = q.transpose().mat_mul(&q).unwrap();
    let eye = NumArray::eye(3, 3, ElementKind::Float64).unwrap();
    assert_close(&qtq, &eye, 1e-12);
}

#[test]
fn qr_is_thin_for_tall_matrices() {
    let m = NumArray::from_shape_vec(&[4, 2], vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0])
        .unwrap();
    let (q, r) = m.qr().unwrap();
    assert_eq!(q.dims(), &[4, 2]);
    assert_eq!(r.dims(), &[2, 2]);
    assert_close(&q.mat_mul(&r).unwrap(), &m, 1e-9);

    // Int64 input promotes to Float64
    let i = NumArray::from_shape_vec(&[2, 2], vec![2i64, 0, 0, 3]).unwrap();
    let (q, _) = i.qr().unwrap();
    assert_eq!(q.kind(), ElementKind::Float64);
}

#[test]
fn qr_complex_is_unitary() {
    let m = NumArray::from_shape_vec(
        &[2, 2],
        vec![
            Complex64::new(1.0, 1.0),
            Complex64::new(2.0, -1.0),
            Complex64::new(0.0, 3.0),
            Complex64::new(1.0, 0.0),
        ],
    )
    .unwrap();
    let (q, r) = m.qr().unwrap();
    assert_close(&q.mat_mul(&r).unwrap(), &m, 1e-9);
    let qhq = q.adjoint().unwrap().mat_mul(&q).unwrap();
    let eye = NumArray::eye(2, 2, ElementKind::Complex128).unwrap();
    assert_close(&qhq, &eye, 1e-12);
}

#[test]
fn solve_left_square_system() {
    let a = NumArray::from_shape_vec(&[2, 2], vec![2.0f64, 1.0, 1.0, 3.0]).unwrap();
    let b = NumArray::from_shape_vec(&[2], vec![5.0f64, 10.0]).unwrap();
    let x = a.solve_left(&b).unwrap();
    assert_eq!(x.dims(), &[2]);
    assert_abs_diff_eq!(f64_of(x.get(&[0]).unwrap()), 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(f64_of(x.get(&[1]).unwrap()), 3.0, epsilon = 1e-9);

    // matrix right side keeps its columns
    let eye = NumArray::eye(2, 2, ElementKind::Float64).unwrap();
    let inv = a.solve_left(&eye).unwrap();
    assert_close(&a.mat_mul(&inv).unwrap(), &eye, 1e-9);
}

#[test]
fn solve_left_least_squares_and_failures() {
    // consistent overdetermined system solves exactly
    let a = NumArray::from_shape_vec(&[3, 2], vec![1.0f64, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
    let x = NumArray::from_shape_vec(&[2], vec![2.0f64, -1.0]).unwrap();
    let b = a.mat_mul(&x).unwrap();
    let got = a.solve_left(&b).unwrap();
    assert_close(&got, &x, 1e-9);

    let sing = NumArray::from_shape_vec(&[2, 2], vec![1.0f64, 2.0, 2.0, 4.0]).unwrap();
    let rhs = NumArray::from_shape_vec(&[2], vec![1.0f64, 2.0]).unwrap();
    assert_eq!(sing.solve_left(&rhs).unwrap_err().kind(), ErrorKind::Singular);

    let under = NumArray::from_shape_vec(&[1, 2], vec![1.0f64, 1.0]).unwrap();
    let one = NumArray::from_shape_vec(&[1], vec![1.0f64]).unwrap();
    assert_eq!(under.solve_left(&one).unwrap_err().kind(), ErrorKind::ShapeMismatch);

    let tall = NumArray::from_shape_vec(&[3, 1], vec![1.0f64, 1.0, 1.0]).unwrap();
    let short = NumArray::from_shape_vec(&[2], vec![1.0f64, 1.0]).unwrap();
    assert_eq!(tall.solve_left(&short).unwrap_err().kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn solve_left_complex_system() {
    let i = Complex64::new(0.0, 1.0);
    let a = NumArray::from_shape_vec(
        &[2, 2],
        vec![Complex64::new(1.0, 0.0), i, -i, Complex64::new(2.0, 0.0)],
    )
    .unwrap();
    let x = NumArray::from_shape_vec(&[2], vec![Complex64::new(1.0, 1.0), Complex64::new(0.0, -2.0)])
        .unwrap();
    let b = a.mat_mul(&x).unwrap();
    let got = a.solve_left(&b).unwrap();
    for k in 0..2 {
        let want = c128_of(x.get(&[k]).unwrap());
        let have = c128_of(got.get(&[k]).unwrap());
        assert_abs_diff_eq!((want - have).norm(), 0.0, epsilon = 1e-9);
    }
}

#[test]
fn solve_right_mirrors_solve_left() {
    let a = NumArray::from_shape_vec(&[2, 2], vec![4.0f64, 7.0, 2.0, 6.0]).unwrap();
    let x = NumArray::from_shape_vec(&[2, 2], vec![1.0f64, 2.0, 3.0, 4.0]).unwrap();
    let b = x.mat_mul(&a).unwrap();
    let got = b.solve_right(&a).unwrap();
    assert_close(&got, &x, 1e-9);
}

#[test]
fn matrix_pow_by_squaring() {
    let a = NumArray::from_shape_vec(&[2, 2], vec![1i64, 1, 0, 1]).unwrap();
    let p0 = a.matrix_pow(0).unwrap();
    assert_eq!(p0.kind(), ElementKind::Int64);
    assert_eq!(p0.get(&[0, 1]).unwrap(), Scalar::Int64(0));

    let p5 = a.matrix_pow(5).unwrap();
    assert_eq!(p5.kind(), ElementKind::Int64);
    assert_eq!(p5.get(&[0, 1]).unwrap(), Scalar::Int64(5));

    let p2 = a.matrix_pow(2).unwrap();
    let aa = a.mat_mul(&a).unwrap();
    for i in 0..2 {
        for j in 0..2 {
            assert_eq!(p2.get(&[i, j]).unwrap(), aa.get(&[i, j]).unwrap());
        }
    }

    let rect = NumArray::from_shape_vec(&[1, 2], vec![1i64, 2]).unwrap();
    assert_eq!(rect.matrix_pow(2).unwrap_err().kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn negative_matrix_pow_inverts() {
    let a = NumArray::from_shape_vec(&[2, 2], vec![2.0f64, 0.0, 0.0, 4.0]).unwrap();
    let inv = a.matrix_pow(-1).unwrap();
    assert_abs_diff_eq!(f64_of(inv.get(&[0, 0]).unwrap()), 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(f64_of(inv.get(&[1, 1]).unwrap()), 0.25, epsilon = 1e-12);

    let eye = NumArray::eye(2, 2, ElementKind::Float64).unwrap();
    assert_close(&a.mat_mul(&inv).unwrap(), &eye, 1e-12);

    // inverse powers compose
    let im2 = a.matrix_pow(-2).unwrap();
    assert_abs_diff_eq!(f64_of(im2.get(&[1, 1]).unwrap()), 0.0625, epsilon = 1e-12);

    let sing = NumArray::from_shape_vec(&[2, 2], vec![1.0f64, 2.0, 2.0, 4.0]).unwrap();
    assert_eq!(sing.matrix_pow(-1).unwrap_err().kind(), ErrorKind::Singular);
}

#[test]
fn linreg_recovers_exact_coefficients() {
    let x = NumArray::from_shape_vec(&[4], vec![0.0f64, 1.0, 2.0, 3.0]).unwrap();
    let y = NumArray::from_shape_vec(&[4], vec![3.0f64, 5.0, 7.0, 9.0]).unwrap();
    let fit = linreg(&x, &y).unwrap();
    assert_eq!(fit.coefficients.dims(), &[2]);
    assert_abs_diff_eq!(f64_of(fit.coefficients.get(&[0]).unwrap()), 3.0, epsilon = 1e-9);
    assert_abs_diff_eq!(f64_of(fit.coefficients.get(&[1]).unwrap()), 2.0, epsilon = 1e-9);
    assert_eq!(fit.dof, 2);
    let worst = f64_of(fit.residuals.abs().unwrap().max().unwrap());
    assert!(worst <= 1e-9);
}

#[test]
fn linreg_with_two_regressors() {
    // y = 1 + 2 x1 - 3 x2
    let x = NumArray::from_shape_vec(
        &[4, 2],
        vec![0.0f64, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0],
    )
    .unwrap();
    let y = NumArray::from_shape_vec(&[4], vec![1.0f64, 3.0, -2.0, 0.0]).unwrap();
    let fit = linreg(&x, &y).unwrap();
    assert_abs_diff_eq!(f64_of(fit.coefficients.get(&[0]).unwrap()), 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(f64_of(fit.coefficients.get(&[1]).unwrap()), 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(f64_of(fit.coefficients.get(&[2]).unwrap()), -3.0, epsilon = 1e-9);
    assert_eq!(fit.dof, 1);
}

#[test]
fn linreg_shape_checks() {
    let x = NumArray::from_shape_vec(&[3], vec![0.0f64, 1.0, 2.0]).unwrap();
    let y = NumArray::from_shape_vec(&[2], vec![0.0f64, 1.0]).unwrap();
    assert_eq!(linreg(&x, &y).unwrap_err().kind(), ErrorKind::ShapeMismatch);

    // one observation cannot determine two coefficients
    let x1 = NumArray::from_shape_vec(&[1], vec![0.0f64]).unwrap();
    let y1 = NumArray::from_shape_vec(&[1], vec![0.0f64]).unwrap();
    assert_eq!(linreg(&x1, &y1).unwrap_err().kind(), ErrorKind::DomainError);
}
