use approx::assert_abs_diff_eq;
use ndarray::arr2;

use crate::errors::{Operator, TensorError};
use crate::tensor::{Tensor, TensorExt, broadcast_shape};

#[test]
fn test_from_data_and_scalar() {
    let t = Tensor::from_data(&[1., 2., 3., 4., 5., 6.], &[2, 3]).unwrap();
    assert_eq!(t, arr2(&[[1., 2., 3.], [4., 5., 6.]]));
    assert_eq!(Tensor::scalar(7.).shape(), &[1, 1]);
    assert_eq!(Tensor::scalar(7.).get_data_number(), Some(7.));
    assert_eq!(t.get_data_number(), None);

    // 元素个数与形状不符、或不是二维
    assert!(Tensor::from_data(&[1., 2., 3.], &[2, 2]).is_err());
    assert!(Tensor::from_data(&[1., 2., 3.], &[3]).is_err());
}

#[test]
fn test_broadcast_shape() {
    assert_eq!(broadcast_shape(&[3, 3], &[1, 1]), Some([3, 3]));
    assert_eq!(broadcast_shape(&[3, 1], &[1, 4]), Some([3, 4]));
    assert_eq!(broadcast_shape(&[2, 3], &[2, 3]), Some([2, 3]));
    assert_eq!(broadcast_shape(&[2, 3], &[3, 2]), None);
}

#[test]
fn test_checked_add_broadcasts_scalar() {
    let a = arr2(&[[1., 2.], [3., 4.]]);
    let b = Tensor::scalar(10.);
    assert_eq!(a.checked_add(&b).unwrap(), arr2(&[[11., 12.], [13., 14.]]));
    assert_eq!(b.checked_add(&a).unwrap(), arr2(&[[11., 12.], [13., 14.]]));
}

#[test]
fn test_checked_add_shape_mismatch() {
    let a = arr2(&[[1., 2., 3.]]);
    let b = arr2(&[[1., 2.]]);
    assert_eq!(
        a.checked_add(&b),
        Err(TensorError::OperatorError {
            operator: Operator::Add,
            tensor1_shape: vec![1, 3],
            tensor2_shape: vec![1, 2],
        })
    );
}

#[test]
fn test_checked_dot() {
    let w = arr2(&[[1.], [2.], [3.]]);
    let x = arr2(&[[4., 5., 6.]]);
    let out = w.checked_dot(&x).unwrap();
    assert_eq!(out, arr2(&[[4., 5., 6.], [8., 10., 12.], [12., 15., 18.]]));

    assert!(x.checked_dot(&x).is_err());
}

#[test]
fn test_sum_to_shape() {
    let g = arr2(&[[1., 2., 3.], [4., 5., 6.]]);
    // 列求和
    assert_eq!(g.sum_to_shape(&[1, 3]).unwrap(), arr2(&[[5., 7., 9.]]));
    // 行求和
    assert_eq!(g.sum_to_shape(&[2, 1]).unwrap(), arr2(&[[6.], [15.]]));
    // 全部求和
    assert_eq!(g.sum_to_shape(&[1, 1]).unwrap(), Tensor::scalar(21.));
    // 形状不变
    assert_eq!(g.sum_to_shape(&[2, 3]).unwrap(), g);
    // 无法由目标形状广播得到
    assert!(g.sum_to_shape(&[3, 1]).is_err());
}

#[test]
fn test_reshaped_keeps_row_major_order() {
    let t = arr2(&[[1., 2., 3.], [4., 5., 6.]]);
    assert_eq!(
        t.reshaped(&[6, 1]).unwrap(),
        arr2(&[[1.], [2.], [3.], [4.], [5.], [6.]])
    );
    assert!(t.reshaped(&[4, 1]).is_err());
}

#[test]
fn test_sigmoid() {
    let t = arr2(&[[0., 2.]]).sigmoid();
    assert_abs_diff_eq!(t[[0, 0]], 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(t[[0, 1]], 0.880_797_077_977_882_3, epsilon = 1e-12);
}
