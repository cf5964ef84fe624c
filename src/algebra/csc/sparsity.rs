use crate::algebra::{CscMatrix, FloatT, SparseFormatError};

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// True if `self` and `other` have the same dimensions and the same
    /// structural entries.  Values are not compared.
    pub fn has_same_sparsity(&self, other: &CscMatrix<T>) -> bool {
        self.m == other.m
            && self.n == other.n
            && self.colptr == other.colptr
            && self.rowval == other.rowval
    }

    /// Returns an error if `self` and `other` do not share a sparsity
    /// pattern.  Values are not compared.
    pub fn check_equal_sparsity(&self, other: &CscMatrix<T>) -> Result<(), SparseFormatError> {
        if self.m != other.m || self.n != other.n {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if self.has_same_sparsity(other) {
            Ok(())
        } else {
            Err(SparseFormatError::SparsityMismatch)
        }
    }
}

#[test]
fn test_equal_sparsity_ignores_values() {
    let A = CscMatrix::new(2, 2, vec![0, 1, 3], vec![0, 0, 1], vec![1., 2., 3.]);
    let mut B = A.clone();
    B.nzval = vec![-4., 0., 9.];
    assert!(A.check_equal_sparsity(&B).is_ok());

    let C = CscMatrix::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1., 2., 3.]);
    assert_eq!(
        A.check_equal_sparsity(&C),
        Err(SparseFormatError::SparsityMismatch)
    );

    let D = CscMatrix::<f64>::zeros((3, 2));
    assert_eq!(
        A.check_equal_sparsity(&D),
        Err(SparseFormatError::IncompatibleDimension)
    );
}
