#![allow(non_snake_case)]
use super::*;

/// Positions of the data entries within the assembled KKT matrix.
#[derive(Debug)]
pub(crate) struct KktDataMap {
    /// entry `k` of `P` is stored at `K.nzval[P[k]]`
    pub P: Vec<usize>,
    /// entry `k` of `A` is stored at `K.nzval[A[k]]`
    pub A: Vec<usize>,
    /// the diagonal of every column, including structural zeros
    pub diag: Vec<usize>,
}

/// Assemble the upper triangle of
///
/// ```text
/// [P + D₁   Aᵀ ]
/// [A       -D₂ ]
/// ```
///
/// for an upper triangular `P`, with every diagonal entry present.
/// Values are written by [`fill_kkt_values`].
pub(crate) fn assemble_kkt_matrix<T: FloatT>(
    P: &CscMatrix<T>,
    A: &CscMatrix<T>,
) -> (CscMatrix<T>, KktDataMap) {
    let (m, n) = A.size();
    let dim = n + m;

    // column counts: P plus its diagonal, then each row of A plus a
    // diagonal entry
    let mut colptr = vec![0; dim + 1];
    for col in 0..n {
        let rng = P.colptr[col]..P.colptr[col + 1];
        let has_diag = P.rowval[rng.clone()].last() == Some(&col);
        colptr[col + 1] = rng.len() + usize::from(!has_diag);
    }
    for &row in &A.rowval {
        colptr[n + row + 1] += 1;
    }
    for k in n..dim {
        colptr[k + 1] += 1;
    }
    for k in 0..dim {
        colptr[k + 1] += colptr[k];
    }
    let nnz = colptr[dim];

    let mut rowval = vec![0; nnz];
    let mut map = KktDataMap {
        P: vec![0; P.nnz()],
        A: vec![0; A.nnz()],
        diag: vec![0; dim],
    };

    // diagonals go last in every column, since the matrix is triu
    for (k, d) in map.diag.iter_mut().enumerate() {
        *d = colptr[k + 1] - 1;
        rowval[*d] = k;
    }

    for col in 0..n {
        for (dest, ptr) in (colptr[col]..).zip(P.colptr[col]..P.colptr[col + 1]) {
            rowval[dest] = P.rowval[ptr];
            map.P[ptr] = dest;
        }
    }

    // A enters transposed, so rows of A become columns of K and the
    // columns of A are visited in order to keep the rows sorted
    let mut next = colptr[n..dim].to_vec();
    for col in 0..n {
        for ptr in A.colptr[col]..A.colptr[col + 1] {
            let dest = &mut next[A.rowval[ptr]];
            rowval[*dest] = col;
            map.A[ptr] = *dest;
            *dest += 1;
        }
    }

    let K = CscMatrix::new(dim, dim, colptr, rowval, vec![T::zero(); nnz]);
    (K, map)
}

/// Write `P + σI`, `A` and `-diag(d₂)` into a matrix assembled by
/// [`assemble_kkt_matrix`].
pub(crate) fn fill_kkt_values<T: FloatT>(
    K: &mut CscMatrix<T>,
    map: &KktDataMap,
    P: &CscMatrix<T>,
    A: &CscMatrix<T>,
    sigma: T,
    d2: &[T],
) {
    let n = P.n;
    let K = &mut K.nzval;

    for &d in &map.diag[..n] {
        K[d] = sigma;
    }
    // stored diagonals of P land on the entries just set
    for (&dest, &v) in map.P.iter().zip(&P.nzval) {
        if map.diag.binary_search(&dest).is_ok() {
            K[dest] += v;
        } else {
            K[dest] = v;
        }
    }
    for (&dest, &v) in map.A.iter().zip(&A.nzval) {
        K[dest] = v;
    }
    for (&d, &v) in map.diag[n..].iter().zip(d2) {
        K[d] = -v;
    }
}

#[test]
fn test_kkt_assembly() {
    // P has no (1,1) entry, A has an empty row
    let P = CscMatrix::new(2, 2, vec![0, 1, 2], vec![0, 0], vec![4., 1.]);
    let A = CscMatrix::from(&[
        [1., 2.], //
        [0., 0.], //
        [0., 3.], //
    ]);

    let (mut K, map) = assemble_kkt_matrix(&P, &A);
    assert!(K.check_format().is_ok());
    assert!(K.is_triu());
    assert_eq!(map.diag, vec![0, 2, 5, 6, 8]);

    fill_kkt_values(&mut K, &map, &P, &A, 0.5, &[1., 2., 3.]);

    let Kdense = [
        [4.5, 1., 1., 0., 0.],
        [0., 0.5, 2., 0., 3.],
        [0., 0., -1., 0., 0.],
        [0., 0., 0., -2., 0.],
        [0., 0., 0., 0., -3.],
    ];
    for (i, row) in Kdense.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            assert_eq!(K.get_entry((i, j)).unwrap_or(0.), v);
        }
    }

    // refilling does not accumulate
    fill_kkt_values(&mut K, &map, &P, &A, 0.5, &[1., 2., 3.]);
    assert_eq!(K.get_entry((0, 0)), Some(4.5));
}
