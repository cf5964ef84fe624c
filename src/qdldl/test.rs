use super::*;
use crate::algebra::{CscMatrix, FloatT};

fn test_matrix_4x4() -> CscMatrix<f64> {
    // A =
    //[ 8.0  -3.0   2.0    ⋅ ]
    //[  ⋅    8.0  -1.0    ⋅ ]
    //[  ⋅     ⋅    8.0  -1.0]
    //[  ⋅     ⋅     ⋅    1.0]
    let Ap = vec![0, 1, 3, 6, 8];
    let Ai = vec![0, 0, 1, 0, 1, 2, 2, 3];
    let Ax = vec![8., -3., 8., 2., -1., 8., -1., 1.];
    CscMatrix::new(4, 4, Ap, Ai, Ax)
}

// upper triangle of
// [4  1  1]
// [1  3  0]
// [1  0 -2]
fn test_quasidef_3x3() -> CscMatrix<f64> {
    CscMatrix::new(3, 3, vec![0, 1, 3, 5], vec![0, 0, 1, 0, 2], vec![4., 1., 3., 1., -2.])
}

fn inf_norm_diff<T: FloatT>(a: &[T], b: &[T]) -> T {
    zip(a, b).fold(T::zero(), |acc, (x, y)| T::max(acc, T::abs(*x - *y)))
}

#[test]
fn test_invperm() {
    assert_eq!(invperm(&[3, 0, 2, 1]).unwrap(), vec![1, 3, 2, 0]);
    // repeated index
    assert_eq!(invperm(&[3, 0, 2, 0]), Err(LdlError::InvalidPermutation));
    // index too big
    assert_eq!(invperm(&[4, 0, 2, 1]), Err(LdlError::InvalidPermutation));
}

#[test]
fn test_permute() {
    let perm = vec![3, 0, 2, 1];
    let b = vec![1., 2., 3., 4.];
    let mut x = vec![0.; 4];
    let mut y = vec![0.; 4];

    permute(&mut x, &b, &perm);
    assert_eq!(x, vec![4., 1., 3., 2.]);

    ipermute(&mut y, &x, &perm);
    assert_eq!(y, b);
}

#[test]
fn test_solve_from_factors() {
    //L =
    //[ ⋅    ⋅     ⋅    ⋅ ]
    //[1.0   ⋅     ⋅    ⋅ ]
    //[2.0  1.0    ⋅    ⋅ ]
    //[ ⋅   7.0  -3.0   ⋅ ]
    let L = CscMatrix::new(
        4,
        4,
        vec![0, 2, 4, 5, 5],
        vec![1, 2, 2, 3, 3],
        vec![1., 2., 1., 7., -3.],
    );
    let dinv = [0.25, -1.0, -0.5, 1.0];
    let x = vec![-3., 2., 1., 4.];

    let mut b = vec![-3., -1., -3., 15.];
    lsolve(&L, &mut b);
    assert_eq!(b, x);

    let mut b = vec![1., 31., -11., 4.];
    ltsolve(&L, &mut b);
    assert_eq!(b, x);

    let mut b = vec![4., -27., -1., -279.];
    solve_factored(&L, &dinv, &mut b);
    assert_eq!(b, x);
}

#[test]
fn test_etree() {
    let A = test_matrix_4x4();
    let mut Lnz = vec![0; 4];
    let mut iwork = vec![0; 12];
    let mut etree = vec![0; 4];

    elimination_tree(&A, &mut iwork, &mut Lnz, &mut etree);

    assert_eq!(etree, vec![1, 2, 3, UNKNOWN]);
    assert_eq!(Lnz, vec![2, 1, 1, 0]);
}

#[test]
fn test_amd() {
    let A = test_matrix_4x4();
    let (perm, iperm) = amd_ordering(&A, 1.5).unwrap();
    assert_eq!(perm, [3, 0, 1, 2]);
    assert_eq!(iperm, [1, 2, 3, 0]);
}

#[test]
fn test_permute_symmetric() {
    // the identity permutation changes nothing
    let A = test_matrix_4x4();
    let (P, AtoPAPt) = permute_symmetric(&A, &[0, 1, 2, 3]);
    assert_eq!(P, A);
    assert_eq!(AtoPAPt, (0..A.nnz()).collect::<Vec<_>>());

    // rows end up unordered within columns of the permuted matrix
    let mut A = test_matrix_4x4();
    for (i, v) in A.nzval.iter_mut().enumerate() {
        *v = i as f64 + 1.;
    }
    let iperm = invperm(&[2, 3, 0, 1]).unwrap();
    let (P, AtoPAPt) = permute_symmetric(&A, &iperm);

    assert_eq!(P.colptr, vec![0, 1, 3, 5, 8]);
    assert_eq!(P.rowval, vec![0, 0, 1, 2, 0, 2, 3, 0]);
    assert_eq!(P.nzval, vec![6.0, 7.0, 8.0, 1.0, 4.0, 2.0, 3.0, 5.0]);
    for (k, &dest) in AtoPAPt.iter().enumerate() {
        assert_eq!(P.nzval[dest], A.nzval[k]);
    }
}

#[test]
fn test_settings_builder() {
    let opts = LdlSettings::default();
    assert_eq!(opts.amd_dense_scale, 1.0);
    assert!(opts.perm.is_none());

    let opts = LdlSettingsBuilder::default()
        .perm(vec![0, 1, 2, 3])
        .amd_dense_scale(1.5)
        .build()
        .unwrap();
    assert_eq!(opts.perm, Some(vec![0, 1, 2, 3]));
    assert_eq!(opts.amd_dense_scale, 1.5);
}

#[test]
fn test_solve_basic() {
    let A = test_matrix_4x4();
    let x = [1., -2., 3., -4.];
    let b = [20.0, -22.0, 32.0, -7.0];

    // no permutation, AMD, then a user specified permutation
    let settings = [
        Some(LdlSettingsBuilder::default().perm(vec![0, 1, 2, 3]).build().unwrap()),
        None,
        Some(LdlSettingsBuilder::default().perm(vec![3, 0, 2, 1]).build().unwrap()),
    ];

    for opts in settings {
        let mut factors = LdlFactorisation::new(&A, opts).unwrap();
        assert_eq!(factors.refactor().unwrap(), 4);
        let mut sol = b;
        factors.solve(&mut sol);
        assert!(inf_norm_diff(&x, &sol) <= 1e-8);
    }
}

#[test]
#[should_panic]
fn test_solve_before_factor() {
    let A = test_matrix_4x4();
    let mut factors = LdlFactorisation::new(&A, None).unwrap();
    let mut b = [20.0, -22.0, 32.0, -7.0];
    factors.solve(&mut b);
}

#[test]
fn test_quasidefinite_inertia() {
    let A = test_quasidef_3x3();
    let mut factors = LdlFactorisation::new(&A, None).unwrap();
    assert_eq!(factors.refactor().unwrap(), 2);
    assert_eq!(factors.positive_inertia(), 2);

    // A * [1, 1, 1] = [6, 4, -1]
    let mut b = [6., 4., -1.];
    factors.solve(&mut b);
    assert!(inf_norm_diff(&b, &[1., 1., 1.]) <= 1e-12);

    // flip the diagonal signs, leaving one positive pivot
    factors.set_values(&[-4., 1., -3., 1., 2.]);
    assert!(!factors.is_factored());
    assert_eq!(factors.refactor().unwrap(), 1);

    let mut b = [-2., -2., 3.];
    factors.solve(&mut b);
    assert!(inf_norm_diff(&b, &[1., 1., 1.]) <= 1e-12);
}

#[test]
fn test_bad_numeric_pivot() {
    // zero in the top left
    let mut A = test_matrix_4x4();
    A.nzval[0] = 0.;
    let mut factors = LdlFactorisation::new(&A, None).unwrap();
    assert!(matches!(factors.refactor(), Err(LdlError::ZeroPivot(_))));
    assert!(!factors.is_factored());

    // zero in the bottom right
    let mut A = test_matrix_4x4();
    *A.nzval.last_mut().unwrap() = 0.;
    let mut factors = LdlFactorisation::new(&A, None).unwrap();
    assert!(matches!(factors.refactor(), Err(LdlError::ZeroPivot(_))));
}

#[test]
fn test_lower_triangular() {
    let A = CscMatrix::from(&[
        //
        [1.0, 3.0, 5.0],
        [2.0, 3.0, 6.0],
        [1.0, 4.0, 7.0],
    ]);
    assert_eq!(
        LdlFactorisation::new(&A, None).err(),
        Some(LdlError::NotUpperTriangular)
    );
}

#[test]
fn test_zero_column_error() {
    let A = CscMatrix::from(&[
        //
        [1.0, 0.0, 5.0],
        [0.0, 0.0, 6.0],
        [0.0, 0.0, 7.0],
    ]);
    assert_eq!(
        LdlFactorisation::new(&A, None).err(),
        Some(LdlError::EmptyColumn)
    );
}

#[test]
fn test_empty_matrix() {
    let A = CscMatrix::<f64>::zeros((0, 0));
    let mut factors = LdlFactorisation::new(&A, None).unwrap();
    assert_eq!(factors.refactor(), Ok(0));
    let mut b: [f64; 0] = [];
    factors.solve(&mut b);
}
