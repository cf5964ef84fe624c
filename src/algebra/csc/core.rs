#![allow(non_snake_case)]

use crate::algebra::{Adjoint, FloatT, MatrixShape, ShapedMatrix, SparseFormatError, Symmetric};

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Sparse matrix in compressed sparse column (CSC) format.
///
/// This is the form in which a [`Model`](crate::modelling::Model) hands
/// `P` and `A` to an engine.  Entries of column `j` are stored in
/// `rowval[colptr[j]..colptr[j+1]]` and `nzval[colptr[j]..colptr[j+1]]`,
/// with strictly increasing row indices.
///
/// The 3 x 2 matrix
/// ```text
/// A = [1.  0.]
///     [2.  3.]
///     [0.  4.]
/// ```
/// is written as
///
/// ```
/// use qpmodel::algebra::CscMatrix;
///
/// let A = CscMatrix::new(
///    3,                    // m
///    2,                    // n
///    vec![0, 2, 4],        // colptr
///    vec![0, 1, 1, 2],     // rowval
///    vec![1., 2., 3., 4.], // nzval
///  );
/// assert!(A.check_format().is_ok());
/// assert_eq!(A.get_entry((1, 1)), Some(3.));
/// ```

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct CscMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// start of each column in `rowval` and `nzval`, length `n+1`
    pub colptr: Vec<usize>,
    /// row index of each stored entry
    pub rowval: Vec<usize>,
    /// value of each stored entry
    pub nzval: Vec<T>,
}

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// Build a matrix from its raw CSC arrays.
    ///
    /// # Panics
    /// Panics if the array lengths disagree with each other or with `n`.
    /// Row ordering and bounds are not checked here, see
    /// [`check_format`](CscMatrix::check_format).
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(colptr.len(), n + 1);
        assert_eq!(rowval.len(), nzval.len());
        assert_eq!(colptr[n], rowval.len());
        CscMatrix {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// An `m x n` matrix with no stored entries.
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        CscMatrix::new(m, n, vec![0; n + 1], vec![], vec![])
    }

    /// The `n x n` identity.
    pub fn identity(n: usize) -> Self {
        CscMatrix::new(n, n, (0..=n).collect(), (0..n).collect(), vec![T::one(); n])
    }

    /// number of stored entries
    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    /// transposed view
    pub fn t(&self) -> Adjoint<'_, Self> {
        Adjoint { src: self }
    }

    /// Symmetric view of a matrix holding only its upper triangle.
    pub fn sym(&self) -> Symmetric<'_, Self> {
        debug_assert!(self.is_triu());
        Symmetric { src: self }
    }

    /// Check the CSC invariants: consistent lengths, a nondecreasing
    /// `colptr` starting at zero, and in-range, strictly increasing row
    /// indices within each column.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.colptr.len() != self.n + 1 || self.rowval.len() != self.nzval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if self.colptr[self.n] != self.rowval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if self.colptr[0] != 0 || self.colptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr);
        }

        for rows in self.colptr.windows(2).map(|c| &self.rowval[c[0]..c[1]]) {
            if rows.last().is_some_and(|&r| r >= self.m) {
                return Err(SparseFormatError::BadRowval);
            }
            if rows.windows(2).any(|r| r[0] >= r[1]) {
                return Err(SparseFormatError::BadRowOrdering);
            }
        }
        Ok(())
    }

    /// True if no entry is stored below the diagonal.  Stored zeros count.
    pub fn is_triu(&self) -> bool {
        self.colptr
            .windows(2)
            .enumerate()
            .all(|(col, c)| self.rowval[c[0]..c[1]].iter().all(|&row| row <= col))
    }

    /// Value stored at `(row, col)`, or `None` if the entry is not stored.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn get_entry(&self, idx: (usize, usize)) -> Option<T> {
        let (row, col) = idx;
        assert!(row < self.m && col < self.n);

        let start = self.colptr[col];
        let rows = &self.rowval[start..self.colptr[col + 1]];
        rows.binary_search(&row)
            .ok()
            .map(|k| self.nzval[start + k])
    }
}

impl<T> ShapedMatrix for CscMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::N
    }
}

/// Dense row-major array to `CscMatrix`, keeping only nonzero entries.
impl<T, const M: usize, const N: usize> From<&[[T; N]; M]> for CscMatrix<T>
where
    T: FloatT,
{
    fn from(rows: &[[T; N]; M]) -> CscMatrix<T> {
        let (I, J, V) = rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, &v)| (i, j, v)))
            .filter(|&(_, _, v)| v != T::zero())
            .fold((vec![], vec![], vec![]), |(mut I, mut J, mut V), (i, j, v)| {
                I.push(i);
                J.push(j);
                V.push(v);
                (I, J, V)
            });
        CscMatrix::new_from_triplets(M, N, I, J, V)
    }
}

#[test]
fn test_csc_constructors() {
    let Z = CscMatrix::<f64>::zeros((3, 2));
    assert_eq!(Z.colptr, vec![0, 0, 0]);
    assert_eq!(Z.nnz(), 0);
    assert!(Z.check_format().is_ok());
    assert!(Z.get_entry((2, 1)).is_none());

    let I = CscMatrix::<f64>::identity(3);
    assert!(I.check_format().is_ok());
    assert!(I.is_triu());
    assert_eq!(I.get_entry((1, 1)), Some(1.));
    assert_eq!(I.get_entry((0, 1)), None);

    let D = CscMatrix::from(&[[0., 2.], [3., 0.], [0., 4.]]);
    assert_eq!(D.colptr, vec![0, 1, 3]);
    assert_eq!(D.rowval, vec![1, 0, 2]);
    assert_eq!(D.nzval, vec![3., 2., 4.]);
    assert!(!D.is_triu());
}

#[test]
fn test_csc_check_format() {
    let good = CscMatrix::new(2, 2, vec![0, 1, 3], vec![0, 0, 1], vec![1., 2., 3.]);
    assert!(good.check_format().is_ok());

    let mut bad = good.clone();
    bad.rowval = vec![0, 1, 0];
    assert_eq!(bad.check_format(), Err(SparseFormatError::BadRowOrdering));

    let mut bad = good.clone();
    bad.rowval = vec![0, 0, 2];
    assert_eq!(bad.check_format(), Err(SparseFormatError::BadRowval));

    let mut bad = good.clone();
    bad.colptr = vec![0, 4, 3];
    assert_eq!(bad.check_format(), Err(SparseFormatError::BadColptr));

    let mut bad = good;
    bad.nzval.pop();
    assert_eq!(bad.check_format(), Err(SparseFormatError::IncompatibleDimension));
}
