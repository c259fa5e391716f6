use numarray::{Complex64, ElementKind, ErrorKind, NumArray, Scalar, Slice};

#[test]
fn reshape_preserves_row_major_order() {
    let a = NumArray::from_shape_vec(&[2, 3], vec![1i64, 2, 3, 4, 5, 6]).unwrap();
    let b = a.reshape(&[3, 2]).unwrap();
    assert_eq!(b.dims(), &[3, 2]);
    assert_eq!(b.get(&[0, 1]).unwrap(), Scalar::Int64(2));
    assert_eq!(b.get(&[2, 0]).unwrap(), Scalar::Int64(5));

    let flat = a.reshape(&[6]).unwrap();
    assert_eq!(flat.get(&[4]).unwrap(), Scalar::Int64(5));

    // reshaping back round-trips element for element
    let back = b.reshape(&[2, 3]).unwrap();
    for i in 0..2 {
        for j in 0..3 {
            assert_eq!(back.get(&[i, j]).unwrap(), a.get(&[i, j]).unwrap());
        }
    }

    let err = a.reshape(&[4]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    // an overflowing target product is a shape error, not a panic
    let err = a.reshape(&[usize::MAX, usize::MAX]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn reshape_of_a_contiguous_view_shares_the_buffer() {
    let mut a = NumArray::from_shape_vec(&[4], vec![1i64, 2, 3, 4]).unwrap();
    let b = a.reshape(&[2, 2]).unwrap();
    assert!(a.is_shared() && b.is_shared());

    // writing one side leaves the other untouched
    a.set(&[0], 9i64).unwrap();
    assert_eq!(b.get(&[0, 0]).unwrap(), Scalar::Int64(1));
}

#[test]
fn transpose_reverses_the_axes() {
    let a = NumArray::from_shape_vec(&[2, 3], vec![1i64, 2, 3, 4, 5, 6]).unwrap();
    let t = a.transpose();
    assert_eq!(t.dims(), &[3, 2]);
    for i in 0..2 {
        for j in 0..3 {
            assert_eq!(t.get(&[j, i]).unwrap(), a.get(&[i, j]).unwrap());
        }
    }
    // double transpose round-trips
    let tt = t.transpose();
    assert_eq!(tt.dims(), a.dims());
    assert_eq!(tt.get(&[1, 2]).unwrap(), a.get(&[1, 2]).unwrap());
}

#[test]
fn adjoint_conjugates_complex_entries() {
    let z = NumArray::from_shape_vec(
        &[1, 2],
        vec![Complex64::new(1.0, 2.0), Complex64::new(3.0, -4.0)],
    )
    .unwrap();
    let h = z.adjoint().unwrap();
    assert_eq!(h.dims(), &[2, 1]);
    assert_eq!(
        h.get(&[0, 0]).unwrap(),
        Scalar::Complex128(Complex64::new(1.0, -2.0))
    );
    assert_eq!(
        h.get(&[1, 0]).unwrap(),
        Scalar::Complex128(Complex64::new(3.0, 4.0))
    );

    // for real kinds the adjoint is the plain transpose
    let a = NumArray::from_shape_vec(&[2, 1], vec![1i64, 2]).unwrap();
    let t = a.adjoint().unwrap();
    assert_eq!(t.dims(), &[1, 2]);
    assert_eq!(t.get(&[0, 1]).unwrap(), Scalar::Int64(2));
}

#[test]
fn strip_singleton_dims_collapses_size_one_axes() {
    let a = NumArray::from_shape_vec(&[1, 3, 1], vec![1i64, 2, 3]).unwrap();
    let s = a.strip_singleton_dims();
    assert_eq!(s.dims(), &[3]);
    assert_eq!(s.get(&[2]).unwrap(), Scalar::Int64(3));

    let one = NumArray::from_shape_vec(&[1, 1], vec![5i64]).unwrap();
    let s = one.strip_singleton_dims();
    assert_eq!(s.ndim(), 0);
    assert_eq!(s.get(&[]).unwrap(), Scalar::Int64(5));
}

#[test]
fn slicing_selects_a_region() {
    let a = NumArray::from_shape_vec(&[3, 4], (0i64..12).collect::<Vec<_>>()).unwrap();
    // middle row, trailing axis taken in full
    let row = a.slice(&[Slice::from(1..2)]).unwrap();
    assert_eq!(row.dims(), &[1, 4]);
    assert_eq!(row.get(&[0, 0]).unwrap(), Scalar::Int64(4));

    // steps skip elements
    let cols = a.slice(&[Slice::from(..), Slice::from(..).step_by(2)]).unwrap();
    assert_eq!(cols.dims(), &[3, 2]);
    assert_eq!(cols.get(&[2, 1]).unwrap(), Scalar::Int64(10));

    // negative indexes count from the back
    let last = a.slice(&[Slice::from(-1..)]).unwrap();
    assert_eq!(last.dims(), &[1, 4]);
    assert_eq!(last.get(&[0, 3]).unwrap(), Scalar::Int64(11));

    // a negative step walks backwards
    let rev = a.slice(&[Slice::from(..), Slice::new(0, None, -1)]).unwrap();
    assert_eq!(rev.get(&[0, 0]).unwrap(), Scalar::Int64(3));
    assert_eq!(rev.get(&[0, 3]).unwrap(), Scalar::Int64(0));
}

#[test]
fn slicing_rejects_bad_arguments() {
    let a = NumArray::from_shape_vec(&[2, 2], vec![1i64, 2, 3, 4]).unwrap();
    let err = a
        .slice(&[Slice::from(..), Slice::from(..), Slice::from(..)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    let err = a.slice(&[Slice::from(0..5)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRange);
}

#[test]
fn slices_are_views_and_writes_are_cow() {
    let mut a = NumArray::from_shape_vec(&[4], vec![1i64, 2, 3, 4]).unwrap();
    let v = a.slice(&[Slice::from(1..3)]).unwrap();
    assert!(a.is_shared());
    assert_eq!(v.get(&[0]).unwrap(), Scalar::Int64(2));

    // writing the parent does not disturb the extracted view
    a.set(&[1], 99i64).unwrap();
    assert_eq!(v.get(&[0]).unwrap(), Scalar::Int64(2));
    assert_eq!(a.get(&[1]).unwrap(), Scalar::Int64(99));
}

#[test]
fn set_slice_writes_only_the_region() {
    let mut a = NumArray::zeros(&[3, 3], ElementKind::Int64).unwrap();
    let block = NumArray::from_shape_vec(&[2, 2], vec![1i64, 2, 3, 4]).unwrap();
    a.set_slice(&[Slice::from(0..2), Slice::from(1..3)], &block).unwrap();
    assert_eq!(a.get(&[0, 1]).unwrap(), Scalar::Int64(1));
    assert_eq!(a.get(&[1, 2]).unwrap(), Scalar::Int64(4));
    // outside the region nothing moved
    assert_eq!(a.get(&[0, 0]).unwrap(), Scalar::Int64(0));
    assert_eq!(a.get(&[2, 2]).unwrap(), Scalar::Int64(0));
}

#[test]
fn set_slice_broadcasts_the_source() {
    let mut a = NumArray::zeros(&[2, 3], ElementKind::Float64).unwrap();
    a.set_slice(&[Slice::from(1..2)], &NumArray::scalar(7.0f64)).unwrap();
    assert_eq!(a.get(&[1, 0]).unwrap(), Scalar::Float64(7.0));
    assert_eq!(a.get(&[1, 2]).unwrap(), Scalar::Float64(7.0));
    assert_eq!(a.get(&[0, 0]).unwrap(), Scalar::Float64(0.0));

    // a source that does not fit the region is rejected
    let wide = NumArray::zeros(&[2, 3], ElementKind::Float64).unwrap();
    let err = a.set_slice(&[Slice::from(0..1)], &wide).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn set_slice_failure_leaves_the_region_intact() {
    let mut a = NumArray::from_shape_vec(&[4], vec![1i64, 2, 3, 4]).unwrap();
    let src = NumArray::from_shape_vec(&[2], vec![5.0f64, 6.5]).unwrap();
    let err = a.set_slice(&[Slice::from(0..2)], &src).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Representability);
    for (i, want) in [1i64, 2, 3, 4].iter().enumerate() {
        assert_eq!(a.get(&[i]).unwrap(), Scalar::Int64(*want));
    }
}

#[test]
fn get_and_set_check_bounds() {
    let mut a = NumArray::from_shape_vec(&[2, 2], vec![1i64, 2, 3, 4]).unwrap();
    assert_eq!(a.get(&[2, 0]).unwrap_err().kind(), ErrorKind::OutOfRange);
    assert_eq!(a.get(&[0]).unwrap_err().kind(), ErrorKind::OutOfRange);
    assert_eq!(a.set(&[0, 9], 0i64).unwrap_err().kind(), ErrorKind::OutOfRange);

    // set narrows into the array's kind up front
    assert_eq!(
        a.set(&[0, 0], 1.5f64).unwrap_err().kind(),
        ErrorKind::Representability
    );
    assert_eq!(a.get(&[0, 0]).unwrap(), Scalar::Int64(1));
    a.set(&[0, 0], 2.0f64).unwrap();
    assert_eq!(a.get(&[0, 0]).unwrap(), Scalar::Int64(2));
}

#[test]
fn fast_copy_materializes_strided_views() {
    let a = NumArray::from_shape_vec(&[3, 4], (0i64..12).collect::<Vec<_>>()).unwrap();
    let v = a
        .slice(&[Slice::from(..).step_by(2), Slice::new(0, None, -1)])
        .unwrap();
    let c = v.fast_copy().unwrap();
    assert!(!c.is_shared());
    assert_eq!(c.dims(), v.dims());
    for i in 0..2 {
        for j in 0..4 {
            assert_eq!(c.get(&[i, j]).unwrap(), v.get(&[i, j]).unwrap());
        }
    }
    // the copy is contiguous, so reshape is metadata again
    let r = c.reshape(&[8]).unwrap();
    assert_eq!(r.get(&[0]).unwrap(), v.get(&[0, 0]).unwrap());
}
