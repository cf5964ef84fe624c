use crate::algebra::*;

#[test]
fn test_copy_from() {
    let x = vec![3., 0., 2., 1.];
    let mut y = vec![0.; 4];
    y.copy_from(&x);
    assert_eq!(x, y);
}

#[test]
fn test_scalarop() {
    let mut x = vec![3., 0., 2., 1.];
    x.scalarop(|x| -2. * x);
    assert_eq!(x, vec![-6., 0., -4., -2.]);
}

#[test]
fn test_set_and_scale() {
    let mut x = [3., 0., 2., 1.];
    x.scale(3.);
    assert_eq!(x, [9., 0., 6., 3.]);
    x.set(-1.);
    assert_eq!(x, [-1.; 4]);
}

#[test]
fn test_recip() {
    let mut x = [4., 10., 2., 1.];
    x.recip();
    assert_eq!(x, [0.25, 0.1, 0.5, 1.]);
}

#[test]
fn test_negate() {
    let mut x = vec![9., 4., 16., 1.];
    x.negate();
    assert_eq!(x, vec![-9., -4., -16., -1.]);
}

#[test]
fn test_hadamard() {
    let mut x = vec![1., 2., 3., 4.];
    let s = vec![-1., -2., -4., 8.];
    x.hadamard(&s);
    assert_eq!(x, vec![-1., -4., -12., 32.]);
}

#[test]
fn test_clip_to() {
    let mut x = vec![-5., 0.5, 7., f64::INFINITY];
    let l = vec![-1., 0., 0., -1e30];
    let u = vec![1., 1., 2., 1e30];
    x.clip_to(&l, &u);
    assert_eq!(x, vec![-1., 0.5, 2., 1e30]);
}

#[test]
fn test_dot() {
    let x = vec![1., -2., 3., -4.];
    let y = vec![-1., -2., 4., 8.];
    assert_eq!(x.dot(&y), -17.);
}

#[test]
fn test_norm_inf() {
    let x = vec![-3., 4., -12.];
    assert_eq!(x.norm_inf(), 12.);

    let x = vec![1., f64::NAN, 2.];
    assert!(x.norm_inf().is_nan());

    let x: Vec<f64> = vec![];
    assert_eq!(x.norm_inf(), 0.);
}

#[test]
fn test_norm_inf_scaled() {
    let x = vec![-3., 4., -12.];
    let v = vec![2., -5., 0.5];
    assert_eq!(x.norm_inf_scaled(&v), 20.);
}

#[test]
fn test_mean() {
    let x = vec![1., 2., 3., 6.];
    assert_eq!(x.mean(), 3.);
    let x: Vec<f64> = vec![];
    assert_eq!(x.mean(), 0.);
}

#[test]
fn test_is_finite() {
    let mut x = vec![1., 2., 3.];
    assert!(x.is_finite());
    x[1] = f64::NEG_INFINITY;
    assert!(!x.is_finite());
    x[1] = f64::NAN;
    assert!(!x.is_finite());
}

#[test]
fn test_axpby() {
    let mut y = vec![1., 2., 3.];
    let x = vec![4., 5., 6.];
    y.axpby(2., &x, -1.);
    assert_eq!(y, vec![7., 8., 9.]);
}

#[test]
fn test_waxpby() {
    let mut w = vec![0.; 3];
    let x = vec![1., 2., 3.];
    let y = vec![4., 5., 6.];
    w.waxpby(2., &x, 3., &y);
    assert_eq!(w, vec![14., 19., 24.]);
}
