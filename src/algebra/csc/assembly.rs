#![allow(non_snake_case)]

//---------------------------------------------------------
// triplet (row, col, value) to compressed sparse column
// assembly, with summation of duplicate entries
//---------------------------------------------------------

use crate::algebra::{CscMatrix, FloatT, SparseFormatError};
use itertools::{izip, Itertools};
use std::cmp::Ordering;

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// Construct a `CscMatrix` from unordered triplets `(I[k], J[k], V[k])`.
    ///
    /// Entries sharing the same `(row, col)` position are summed into a
    /// single structural entry.   The output is canonical: row indices are
    /// strictly increasing within each column, and the same multiset of
    /// triplets produces identical `colptr`, `rowval` and `nzval` arrays
    /// regardless of input order.  Empty inputs produce an `m x n` matrix
    /// with no structural entries.
    ///
    /// # Panics
    /// Panics if the input vectors differ in length or if any index is out
    /// of bounds.   See [`try_new_from_triplets`](CscMatrix::try_new_from_triplets)
    /// for a fallible version.
    ///
    /// ```
    /// use qpmodel::algebra::CscMatrix;
    ///
    /// let A : CscMatrix<f64> = CscMatrix::new_from_triplets(
    ///     2, 2,
    ///     vec![1, 0, 0],
    ///     vec![0, 0, 0],
    ///     vec![1., 3., 4.],
    /// );
    /// assert_eq!(A.nzval, vec![7., 1.]);
    /// ```
    pub fn new_from_triplets(m: usize, n: usize, I: Vec<usize>, J: Vec<usize>, V: Vec<T>) -> Self {
        match Self::try_new_from_triplets(m, n, I, J, V) {
            Ok(A) => A,
            Err(e) => panic!("invalid triplet data: {}", e),
        }
    }

    /// Fallible version of [`new_from_triplets`](CscMatrix::new_from_triplets).
    pub fn try_new_from_triplets(
        m: usize,
        n: usize,
        I: Vec<usize>,
        J: Vec<usize>,
        V: Vec<T>,
    ) -> Result<Self, SparseFormatError> {
        if I.len() != J.len() || I.len() != V.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if I.iter().any(|&r| r >= m) {
            return Err(SparseFormatError::BadRowval);
        }
        if J.iter().any(|&c| c >= n) {
            return Err(SparseFormatError::BadColval);
        }

        let mut triplets: Vec<(usize, usize, T)> = izip!(I, J, V).collect();

        // column-major, row-minor.  Values break ties so that the
        // summation order of duplicates is independent of input order
        triplets.sort_unstable_by(|a, b| {
            (a.1, a.0)
                .cmp(&(b.1, b.0))
                .then_with(|| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal))
        });

        let nnz_max = triplets.len();
        let merged = triplets.into_iter().coalesce(|a, b| {
            if a.0 == b.0 && a.1 == b.1 {
                Ok((a.0, a.1, a.2 + b.2))
            } else {
                Err((a, b))
            }
        });

        let mut colptr = vec![0usize; n + 1];
        let mut rowval = Vec::with_capacity(nnz_max);
        let mut nzval = Vec::with_capacity(nnz_max);

        // entries arrive sorted by column, so a running count per
        // column followed by a cumulative sum gives the pointers
        for (row, col, val) in merged {
            colptr[col + 1] += 1;
            rowval.push(row);
            nzval.push(val);
        }
        for col in 0..n {
            colptr[col + 1] += colptr[col];
        }

        Ok(CscMatrix::new(m, n, colptr, rowval, nzval))
    }

    /// Iterator over the structural entries `(row, col, value)` in
    /// column-major order.
    pub fn triplet_iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.n).flat_map(move |col| {
            (self.colptr[col]..self.colptr[col + 1])
                .map(move |ptr| (self.rowval[ptr], col, self.nzval[ptr]))
        })
    }
}

#[test]
fn test_triplets_merge_duplicates() {
    let A = CscMatrix::new_from_triplets(1, 1, vec![0, 0], vec![0, 0], vec![3.0, 4.0]);
    assert_eq!(A.colptr, vec![0, 1]);
    assert_eq!(A.rowval, vec![0]);
    assert_eq!(A.nzval, vec![7.0]);
}

#[test]
fn test_triplets_empty() {
    let A = CscMatrix::<f64>::new_from_triplets(3, 4, vec![], vec![], vec![]);
    assert_eq!(A.colptr, vec![0; 5]);
    assert!(A.rowval.is_empty());
    assert!(A.nzval.is_empty());
    assert!(A.check_format().is_ok());
}

#[test]
fn test_triplets_bad_index() {
    let A = CscMatrix::<f64>::try_new_from_triplets(2, 2, vec![2], vec![0], vec![1.0]);
    assert_eq!(A.unwrap_err(), SparseFormatError::BadRowval);
    let A = CscMatrix::<f64>::try_new_from_triplets(2, 2, vec![0], vec![5], vec![1.0]);
    assert_eq!(A.unwrap_err(), SparseFormatError::BadColval);
    let A = CscMatrix::<f64>::try_new_from_triplets(2, 2, vec![0, 1], vec![0], vec![1.0]);
    assert_eq!(A.unwrap_err(), SparseFormatError::IncompatibleDimension);
}
