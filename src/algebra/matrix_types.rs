// T = transpose, N = non-transposed
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum MatrixShape {
    N,
    T,
}

/// Dimension queries shared by matrices and matrix views
pub trait ShapedMatrix {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn shape(&self) -> MatrixShape;
    fn size(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }
    fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }
}

/// Adjoint (transposed) view of a matrix
#[derive(Debug, Clone, Copy)]
pub struct Adjoint<'a, M> {
    pub src: &'a M,
}

/// Symmetric view of a matrix whose data is stored as triu
#[derive(Debug, Clone, Copy)]
pub struct Symmetric<'a, M> {
    pub src: &'a M,
}

impl<M> ShapedMatrix for Adjoint<'_, M>
where
    M: ShapedMatrix,
{
    fn nrows(&self) -> usize {
        self.src.ncols()
    }
    fn ncols(&self) -> usize {
        self.src.nrows()
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::T
    }
}

impl<M> ShapedMatrix for Symmetric<'_, M>
where
    M: ShapedMatrix,
{
    fn nrows(&self) -> usize {
        self.src.nrows()
    }
    fn ncols(&self) -> usize {
        self.src.ncols()
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::N
    }
}
