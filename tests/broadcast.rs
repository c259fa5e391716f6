use numarray::{broadcast_shape, ErrorKind, NumArray, Scalar};

#[test]
fn broadcast_shapes_align_from_the_right() {
    assert_eq!(broadcast_shape(&[3, 1], &[1, 4]).unwrap(), vec![3, 4]);
    assert_eq!(broadcast_shape(&[2, 3], &[3]).unwrap(), vec![2, 3]);
    assert_eq!(broadcast_shape(&[3], &[2, 3]).unwrap(), vec![2, 3]);
    assert_eq!(broadcast_shape(&[], &[2, 3]).unwrap(), vec![2, 3]);
    assert_eq!(broadcast_shape(&[5], &[5]).unwrap(), vec![5]);
}

#[test]
fn incompatible_shapes_are_rejected() {
    let err = broadcast_shape(&[2, 3], &[2, 4]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);

    let a = NumArray::from_shape_vec(&[3], vec![1i64, 2, 3]).unwrap();
    let b = NumArray::from_shape_vec(&[4], vec![1i64, 2, 3, 4]).unwrap();
    assert_eq!(a.plus(&b).unwrap_err().kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn column_times_row_makes_a_table() {
    let col = NumArray::from_shape_vec(&[3, 1], vec![1i64, 2, 3]).unwrap();
    let row = NumArray::from_shape_vec(&[1, 4], vec![10i64, 20, 30, 40]).unwrap();
    let t = col.times(&row).unwrap();
    assert_eq!(t.dims(), &[3, 4]);
    for i in 0..3 {
        for j in 0..4 {
            let want = (i as i64 + 1) * (j as i64 + 1) * 10;
            assert_eq!(t.get(&[i, j]).unwrap(), Scalar::Int64(want));
        }
    }
}

#[test]
fn rank_zero_broadcasts_everywhere() {
    let a = NumArray::from_shape_vec(&[2, 2], vec![1.0f64, 2.0, 3.0, 4.0]).unwrap();
    let s = NumArray::scalar(10.0f64);
    let r = a.plus(&s).unwrap();
    assert_eq!(r.dims(), &[2, 2]);
    assert_eq!(r.get(&[1, 1]).unwrap(), Scalar::Float64(14.0));
}

#[test]
fn vector_broadcasts_over_matrix_rows() {
    let m = NumArray::from_shape_vec(&[2, 3], vec![0i64, 0, 0, 10, 10, 10]).unwrap();
    let v = NumArray::from_shape_vec(&[3], vec![1i64, 2, 3]).unwrap();
    let r = m.plus(&v).unwrap();
    assert_eq!(r.get(&[0, 2]).unwrap(), Scalar::Int64(3));
    assert_eq!(r.get(&[1, 0]).unwrap(), Scalar::Int64(11));
}

#[test]
fn assignment_never_grows_the_left_shape() {
    let mut a = NumArray::from_shape_vec(&[3], vec![1i64, 2, 3]).unwrap();
    let wide = NumArray::from_shape_vec(&[2, 3], vec![1i64, 1, 1, 1, 1, 1]).unwrap();
    let err = a.plus_assign(&wide).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    // left operand untouched by the failed call
    assert_eq!(a.get(&[0]).unwrap(), Scalar::Int64(1));
    assert_eq!(a.dims(), &[3]);

    // a broadcastable right side is fine
    a.plus_assign(&NumArray::scalar(1i64)).unwrap();
    assert_eq!(a.get(&[2]).unwrap(), Scalar::Int64(4));
}
